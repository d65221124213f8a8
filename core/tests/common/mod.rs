use search_core::{Doctor, InvertedIndex, Normalizer};
use std::collections::BTreeMap;

pub const A: u32 = 1;
pub const B: u32 = 2;
pub const C: u32 = 3;

pub fn doctor(id: u32, name: &str, specialty: &str, bio: &str) -> Doctor {
    Doctor {
        id,
        name: name.to_string(),
        specialty: specialty.to_string(),
        hospital: None,
        location: None,
        bio: Some(bio.to_string()),
        extra: BTreeMap::new(),
    }
}

/// A mentions "heart" three times in ten tokens, B once in five, C never.
pub fn corpus() -> Vec<Doctor> {
    vec![
        doctor(C, "Cy Moss", "Dermatology", "skin clinic"),
        doctor(A, "Ada Stone", "Cardiology", "heart heart heart valve repair clinic rounds"),
        doctor(B, "Ben Reed", "Neurology", "heart scan"),
    ]
}

pub fn built_index() -> InvertedIndex {
    let mut index = InvertedIndex::new(Normalizer::english());
    index.build(corpus()).unwrap();
    index
}
