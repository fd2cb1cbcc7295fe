//! Node classification by ordered keyword matching.
//!
//! Rules are tried in order and the first keyword group found anywhere in the
//! uppercased identifier decides the category. The order is part of the
//! output contract: `PATIENT_DOCTOR_NOTE` is a Patient, not a Doctor.

use crate::models::Category;

/// Ordered (keywords, category) rules. Anything unmatched is `Other`.
const RULES: &[(&[&str], Category)] = &[
    (&["PATIENT", "MEMBER", "PT_"], Category::Patient),
    (
        &["DOCTOR", "PHYSICIAN", "DR_", "DR.", "PROVIDER"],
        Category::Doctor,
    ),
    (
        &[
            "CONDITION",
            "DIAGNOSIS",
            "DISEASE",
            "INSURANCE",
            "INSURER",
            "POLICY",
            "CLAIM",
        ],
        Category::ConditionInsurance,
    ),
    (
        &[
            "TREATED",
            "TREATS",
            "HAS_",
            "DIAGNOSED",
            "REFERRED",
            "VISITED",
            "COVERED",
            "PRESCRIBED",
        ],
        Category::Relationship,
    ),
];

pub fn classify(node_id: &str) -> Category {
    let upper = node_id.to_uppercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| upper.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Other)
}
