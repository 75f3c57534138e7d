//! Species catalogue offered by the add-pet picker.

/// Picker choices. `Other` lets the user type free text.
pub const COMMON_SPECIES: [&str; 8] = [
    "Dog",
    "Cat",
    "Rabbit",
    "Guinea Pig",
    "Hamster",
    "Bird",
    "Reptile",
    "Other",
];

/// Placeholder row of the species picker; never a valid species.
pub const SPECIES_PLACEHOLDER: &str = "Select Species";

/// Symbolic icon key for a species, matched case-insensitively.
pub fn species_icon(species: &str) -> &'static str {
    match species.trim().to_lowercase().as_str() {
        "dog" => "dog",
        "cat" => "cat",
        "rabbit" => "hare",
        "bird" => "bird",
        "fish" => "fish",
        "tortoise" | "turtle" | "reptile" => "tortoise",
        _ => "pawprint",
    }
}
