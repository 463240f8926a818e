use anyhow::Result;
use serde::Serialize;

/// Pretty-printed JSON for any advice payload (lineups, sale advice,
/// transfer recommendations, full reports, the config itself). Slices work
/// through the `?Sized` bound.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use crate::types::{Player, Position};

    use super::*;

    #[test]
    fn renders_advice_types_and_slices() {
        let roster = vec![Player::new("p1", "One", Position::Goalkeeper)];
        let out = render_json(roster.as_slice()).expect("slice renders");
        assert!(out.contains("\"position\": \"goalkeeper\""));
        assert!(out.contains("\"id\": \"p1\""));
    }
}
