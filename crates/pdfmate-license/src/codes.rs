//! Activation code provisioning
//!
//! Codes look like `LP-1A2B-3C4D`: a fixed prefix and four random bytes in
//! upper-case hex. Batches are loaded into the license table with an insert
//! that skips codes already present.

use std::collections::HashSet;

use rand::RngCore;

pub const CODE_PREFIX: &str = "LP";

/// Generate one random activation code
pub fn generate_code() -> String {
    let mut bytes = [0u8; 4];
    rand::thread_rng().fill_bytes(&mut bytes);
    let hex = hex::encode_upper(bytes);
    format!("{}-{}-{}", CODE_PREFIX, &hex[..4], &hex[4..])
}

/// Generate `count` distinct codes
pub fn generate_batch(count: usize) -> Vec<String> {
    let mut seen = HashSet::with_capacity(count);
    let mut codes = Vec::with_capacity(count);
    while codes.len() < count {
        let code = generate_code();
        if seen.insert(code.clone()) {
            codes.push(code);
        }
    }
    codes
}

/// SQL that provisions `codes` as unused licenses
pub fn insert_statement(codes: &[String]) -> String {
    let values = codes
        .iter()
        .map(|code| format!("('{}')", code.replace('\'', "''")))
        .collect::<Vec<_>>()
        .join(",\n  ");
    format!(
        "INSERT INTO licenses (code) VALUES\n  {}\nON CONFLICT (code) DO NOTHING;\n",
        values
    )
}

/// True if `code` has the `LP-XXXX-XXXX` shape
pub fn is_well_formed(code: &str) -> bool {
    let parts: Vec<&str> = code.split('-').collect();
    matches!(parts.as_slice(), [prefix, a, b]
        if *prefix == CODE_PREFIX
            && [a, b].iter().all(|p| {
                p.len() == 4 && p.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
            }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_generated_code_shape() {
        for _ in 0..50 {
            let code = generate_code();
            assert_eq!(code.len(), 12);
            assert!(is_well_formed(&code), "{}", code);
        }
    }

    #[test]
    fn test_batch_is_unique() {
        let codes = generate_batch(200);
        let unique: HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), 200);
    }

    #[test]
    fn test_insert_statement() {
        let sql = insert_statement(&["LP-0000-0001".to_string(), "LP-0000-0002".to_string()]);
        assert_eq!(
            sql,
            "INSERT INTO licenses (code) VALUES\n  ('LP-0000-0001'),\n  ('LP-0000-0002')\nON CONFLICT (code) DO NOTHING;\n"
        );
    }

    #[test]
    fn test_is_well_formed_rejects_other_shapes() {
        assert!(!is_well_formed("LP-1a2b-3C4D"));
        assert!(!is_well_formed("XX-1A2B-3C4D"));
        assert!(!is_well_formed("LP-1A2B3C4D"));
        assert!(!is_well_formed("LP-1A2B-3C4D-5E6F"));
    }

    proptest! {
        #[test]
        fn insert_statement_lists_every_code(count in 1usize..40) {
            let codes = generate_batch(count);
            let sql = insert_statement(&codes);
            for code in &codes {
                let quoted = format!("('{}')", code);
                prop_assert!(sql.contains(&quoted));
            }
        }
    }
}
