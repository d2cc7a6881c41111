//! Value pools the generators draw from.

use rand::Rng;

use crate::models::PaymentMethod;

pub(crate) const FIRST_NAMES: &[&str] = &[
    "Aarav", "Ananya", "Arjun", "Diya", "Ishaan", "Kavya", "Meera", "Nikhil", "Priya", "Rahul",
    "Riya", "Rohan", "Saanvi", "Sanjay", "Sneha", "Tanvi", "Varun", "Vikram", "Zara", "Aditya",
];

pub(crate) const LAST_NAMES: &[&str] = &[
    "Sharma", "Verma", "Iyer", "Nair", "Reddy", "Patel", "Gupta", "Menon", "Kapoor", "Joshi",
    "Rao", "Das", "Bose", "Chopra", "Malhotra",
];

pub(crate) const STREETS: &[&str] = &[
    "MG Road",
    "Park Street",
    "Linking Road",
    "Brigade Road",
    "Anna Salai",
    "FC Road",
    "Residency Road",
    "Church Street",
];

pub(crate) const CITIES: &[&str] = &[
    "Bengaluru",
    "Mumbai",
    "Chennai",
    "Pune",
    "Hyderabad",
    "Kolkata",
    "Delhi",
];

pub(crate) const BLOOD_GROUPS: &[&str] = &["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

/// A stockable medicine: name, category, strength, form, manufacturer, unit price range.
pub(crate) struct CatalogEntry {
    pub name: &'static str,
    pub category: &'static str,
    pub strength: &'static str,
    pub form: &'static str,
    pub manufacturer: &'static str,
    pub price: (u64, u64),
}

const fn entry(
    name: &'static str,
    category: &'static str,
    strength: &'static str,
    form: &'static str,
    manufacturer: &'static str,
    price: (u64, u64),
) -> CatalogEntry {
    CatalogEntry {
        name,
        category,
        strength,
        form,
        manufacturer,
        price,
    }
}

pub(crate) const MEDICINE_CATALOG: &[CatalogEntry] = &[
    entry("Paracetamol", "Analgesic", "500mg", "Tablet", "Cipla", (1, 3)),
    entry("Ibuprofen", "Analgesic", "400mg", "Tablet", "Abbott", (2, 5)),
    entry("Amoxicillin", "Antibiotic", "250mg", "Capsule", "Sun Pharma", (5, 9)),
    entry("Azithromycin", "Antibiotic", "500mg", "Tablet", "Cipla", (15, 25)),
    entry("Cetirizine", "Antihistamine", "10mg", "Tablet", "Dr. Reddy's", (1, 3)),
    entry("Omeprazole", "Antacid", "20mg", "Capsule", "Lupin", (3, 6)),
    entry("Pantoprazole", "Antacid", "40mg", "Tablet", "Alkem", (4, 8)),
    entry("Metformin", "Antidiabetic", "500mg", "Tablet", "Sun Pharma", (2, 4)),
    entry("Amlodipine", "Antihypertensive", "5mg", "Tablet", "Torrent", (2, 5)),
    entry("Atorvastatin", "Statin", "10mg", "Tablet", "Ranbaxy", (6, 12)),
    entry("Salbutamol", "Bronchodilator", "100mcg", "Inhaler", "GSK", (120, 180)),
    entry("Cough Syrup", "Antitussive", "100ml", "Syrup", "Dabur", (60, 110)),
    entry("Vitamin D3", "Supplement", "60000IU", "Capsule", "Mankind", (25, 40)),
    entry("ORS", "Electrolyte", "21g", "Sachet", "FDC", (15, 25)),
    entry("Diclofenac Gel", "Analgesic", "30g", "Gel", "Novartis", (70, 120)),
];

pub(crate) const VISIT_REASONS: &[&str] = &[
    "Fever and body ache",
    "Persistent cough",
    "Routine check-up",
    "Follow-up visit",
    "Headache",
    "Stomach pain",
    "Skin rash",
    "Blood pressure review",
    "Diabetes review",
    "Joint pain",
];

pub(crate) const DIAGNOSES: &[&str] = &[
    "Viral fever",
    "Upper respiratory tract infection",
    "Acute gastritis",
    "Tension headache",
    "Allergic rhinitis",
    "Essential hypertension",
    "Type 2 diabetes mellitus",
    "Contact dermatitis",
    "Osteoarthritis",
    "Acute bronchitis",
];

/// Dose, schedule and doses per day.
pub(crate) const DOSAGE_PLANS: &[(&str, &str, u32)] = &[
    ("1 tablet", "Once daily", 1),
    ("1 tablet", "Twice daily", 2),
    ("1 tablet", "Thrice daily", 3),
    ("2 tablets", "Twice daily", 4),
];

pub(crate) const COURSE_DAYS: &[u32] = &[3, 5, 7, 10];

pub(crate) const INSTRUCTIONS: &[&str] = &[
    "After food",
    "Before food",
    "At bedtime",
    "With plenty of water",
];

pub(crate) const PAYMENT_METHODS: &[PaymentMethod] = &[
    PaymentMethod::Cash,
    PaymentMethod::Card,
    PaymentMethod::Upi,
    PaymentMethod::Insurance,
];

/// Consultation line on every invoice, whole currency units.
pub(crate) const CONSULTATION_FEE: u64 = 500;

/// Uniform pick from a constant pool.
///
/// Panics on an empty slice; only used with the non-empty pools above.
pub(crate) fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, pool: &'a [T]) -> &'a T {
    &pool[rng.gen_range(0..pool.len())]
}
