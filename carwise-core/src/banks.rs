//! Financing banks offered at the last wizard step
//!
//! The list is static; it is never fetched.

use serde::Serialize;

/// A financing bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bank {
    pub id: u8,
    /// Short name shown on the selection tile
    pub name: &'static str,
    pub logo_url: &'static str,
    pub full_name: &'static str,
}

pub const BANKS: [Bank; 8] = [
    Bank {
        id: 1,
        name: "Al Rajhi",
        logo_url: "/assets/banks/alrajhi.png",
        full_name: "Al Rajhi Bank",
    },
    Bank {
        id: 2,
        name: "SNB",
        logo_url: "/assets/banks/snb.png",
        full_name: "Saudi National Bank",
    },
    Bank {
        id: 3,
        name: "Riyad",
        logo_url: "/assets/banks/riyad.png",
        full_name: "Riyad Bank",
    },
    Bank {
        id: 4,
        name: "ANB",
        logo_url: "/assets/banks/anb.png",
        full_name: "Arab National Bank",
    },
    Bank {
        id: 5,
        name: "SAB",
        logo_url: "/assets/banks/sab.png",
        full_name: "Saudi Awwal Bank",
    },
    Bank {
        id: 6,
        name: "BSF",
        logo_url: "/assets/banks/bsf.png",
        full_name: "Banque Saudi Fransi",
    },
    Bank {
        id: 7,
        name: "Alinma",
        logo_url: "/assets/banks/alinma.png",
        full_name: "Alinma Bank",
    },
    Bank {
        id: 8,
        name: "Albilad",
        logo_url: "/assets/banks/albilad.png",
        full_name: "Bank Albilad",
    },
];

/// Look a bank up by its short name (case-insensitive)
pub fn find_bank(name: &str) -> Option<Bank> {
    BANKS
        .iter()
        .find(|bank| bank.name.eq_ignore_ascii_case(name.trim()))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_bank_ids_and_names_unique() {
        let ids: HashSet<u8> = BANKS.iter().map(|b| b.id).collect();
        let names: HashSet<&str> = BANKS.iter().map(|b| b.name).collect();
        assert_eq!(ids.len(), 8);
        assert_eq!(names.len(), 8);
    }

    #[test]
    fn test_find_bank() {
        assert_eq!(find_bank("anb").map(|b| b.id), Some(4));
        assert_eq!(find_bank(" ANB ").map(|b| b.full_name), Some("Arab National Bank"));
        assert!(find_bank("Unknown").is_none());
    }
}
