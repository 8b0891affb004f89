use crate::games::RandomSource;

const ADJECTIVES: &[&str] = &[
    "Swift", "Brave", "Clever", "Mighty", "Silent", "Golden", "Wild", "Noble",
    "Fierce", "Gentle", "Quick", "Wise", "Bold", "Proud", "Cunning", "Sly",
];

const NOUNS: &[&str] = &[
    "Falcon", "Bear", "Tiger", "Wolf", "Eagle", "Dragon", "Lion", "Panther",
    "Hawk", "Fox", "Raven", "Cobra", "Shark", "Phoenix", "Lynx", "Viper",
];

const ROOM_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const ROOM_CODE_LENGTH: usize = 6;

pub fn generate_player_name(rng: &mut impl RandomSource) -> String {
    let adjective = ADJECTIVES[rng.next_index(ADJECTIVES.len())];
    let noun = NOUNS[rng.next_index(NOUNS.len())];
    format!("{} {}", adjective, noun)
}

pub fn generate_room_code(rng: &mut impl RandomSource) -> String {
    let code: String = (0..ROOM_CODE_LENGTH)
        .map(|_| ROOM_ALPHABET[rng.next_index(ROOM_ALPHABET.len())] as char)
        .collect();
    format!("room-{}", code)
}
