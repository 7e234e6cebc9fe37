// src/common/id_generator.rs
//! Crockford Base32 ID Generator
//!
//! Generates prefixed record ids such as `T_8MWQT2K7NP3X`. The alphabet
//! excludes I, L, O and U so ids survive being read aloud or retyped.

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Random characters per id; 32^12 keeps collisions out of reach for a
/// single shared todos table.
const ID_LENGTH: usize = 12;

/// Entity type prefixes for ID generation
#[derive(Debug, Clone, Copy)]
pub enum EntityPrefix {
    /// Todo item (T_)
    Todo,
    /// Identity-provider account link (A_)
    Account,
    /// Session row (S_)
    Session,
}

impl EntityPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::Todo => "T",
            EntityPrefix::Account => "A",
            EntityPrefix::Session => "S",
        }
    }
}

fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a prefixed ID in the format "PREFIX_XXXXXXXXXXXX"
pub fn generate_id(prefix: EntityPrefix) -> String {
    format!("{}_{}", prefix.as_str(), generate_crockford_string(ID_LENGTH))
}

pub fn generate_todo_id() -> String {
    generate_id(EntityPrefix::Todo)
}

pub fn generate_account_id() -> String {
    generate_id(EntityPrefix::Account)
}

pub fn generate_session_id() -> String {
    generate_id(EntityPrefix::Session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_id_format() {
        let todo_id = generate_todo_id();
        assert!(todo_id.starts_with("T_"));
        assert_eq!(todo_id.len(), 2 + ID_LENGTH);
    }

    #[test]
    fn test_crockford_alphabet_only() {
        let id = generate_todo_id();
        let random_part = &id[2..];

        for c in random_part.chars() {
            assert!(
                CROCKFORD_ALPHABET.contains(&(c as u8)),
                "Character '{}' not in Crockford alphabet",
                c
            );
        }

        assert!(!random_part.contains(['I', 'L', 'O', 'U']));
    }

    #[test]
    fn test_uniqueness() {
        let mut ids = HashSet::new();
        for _ in 0..1000 {
            assert!(ids.insert(generate_todo_id()), "Duplicate ID generated");
        }
    }

    #[test]
    fn test_all_prefixes() {
        assert!(generate_todo_id().starts_with("T_"));
        assert!(generate_account_id().starts_with("A_"));
        assert!(generate_session_id().starts_with("S_"));
    }
}
