//! Case classification for identifiers, backing [`crate::settings::NamingCase`].
//!
//! Pure string predicates — no CST/semantic dependency — so they're cheap
//! to unit test in isolation from the rules that call them.

/// `lower_snake_case`, optionally leading/trailing underscores (`_private`).
pub fn is_snake_case(name: &str) -> bool {
    let core = name.trim_matches('_');
    if core.is_empty() {
        return false;
    }
    core.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && !core.contains("__")
}

/// `UPPER_SNAKE_CASE`, optionally leading/trailing underscores.
pub fn is_screaming_snake_case(name: &str) -> bool {
    let core = name.trim_matches('_');
    if core.is_empty() {
        return false;
    }
    core.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        && !core.contains("__")
}

/// `PascalCase`: starts with an uppercase letter, no underscores.
pub fn is_pascal_case(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {}
        _ => return false,
    }
    name.chars().all(|c| c.is_ascii_alphanumeric())
}

/// `camelCase`: starts with a lowercase letter, no underscores.
pub fn is_camel_case(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {}
        _ => return false,
    }
    name.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_examples() {
        assert!(is_snake_case("player_speed"));
        assert!(is_snake_case("_private"));
        assert!(is_snake_case("a"));
        assert!(!is_snake_case("PlayerSpeed"));
        assert!(!is_snake_case("playerSpeed"));
        assert!(!is_snake_case("double__underscore"));
        assert!(!is_snake_case("___"));
    }

    #[test]
    fn screaming_snake_examples() {
        assert!(is_screaming_snake_case("MAX_SPEED"));
        assert!(is_screaming_snake_case("A"));
        assert!(!is_screaming_snake_case("MaxSpeed"));
        assert!(!is_screaming_snake_case("max_speed"));
    }

    #[test]
    fn pascal_case_examples() {
        assert!(is_pascal_case("PlayerState"));
        assert!(!is_pascal_case("playerState"));
        assert!(!is_pascal_case("Player_State"));
    }

    #[test]
    fn camel_case_examples() {
        assert!(is_camel_case("playerState"));
        assert!(!is_camel_case("PlayerState"));
        assert!(!is_camel_case("player_state"));
    }
}
