use std::str::FromStr;

use chrono::Utc;
use serde_json::{Map, Value};

use crate::ingest::fields::{
    bool_from_paths, integer_from_paths, number_from_paths, object_get_case_insensitive,
    string_from_paths, timestamp_from_paths,
};
use crate::positions::classify;
use crate::types::{MarketListing, Player, PlayerStatus};

// Per-field precedence lists: first present key wins. Order is part of the
// contract with the upstream API and is covered by tests.
pub const PLAYER_ID_KEYS: &[&str] = &["id", "player_id", "playerId", "element"];
pub const PLAYER_NAME_KEYS: &[&str] = &["name", "player_name", "nickname", "web_name"];
pub const POSITION_KEYS: &[&str] = &[
    "position",
    "position_id",
    "positionId",
    "pos",
    "role",
    "element_type",
];
pub const AVERAGE_POINTS_KEYS: &[&str] = &[
    "average_points",
    "averagePoints",
    "avg_points",
    "points_per_game",
    "media",
];
pub const TOTAL_POINTS_KEYS: &[&str] = &["total_points", "totalPoints", "points", "puntos"];
pub const MARKET_VALUE_KEYS: &[&str] = &["market_value", "marketValue", "value", "now_cost"];
pub const VALUE_TREND_KEYS: &[&str] = &[
    "value_trend",
    "valueTrend",
    "trend",
    "value_change",
    "delta",
];
pub const STATUS_KEYS: &[&str] = &["status", "injury_status", "availability", "state"];
pub const OWNED_KEYS: &[&str] = &["owned", "is_owned", "mine"];
pub const ASKING_PRICE_KEYS: &[&str] = &["asking_price", "askingPrice", "price", "sale_price"];
pub const EXPIRY_KEYS: &[&str] = &["expiry", "expires_at", "expiration", "deadline"];
pub const OFFER_COUNT_KEYS: &[&str] = &["offer_count", "offers", "num_offers", "bids"];
pub const SELLER_KEYS: &[&str] = &["seller_id", "sellerId", "seller", "owner_id", "team_id"];

/// Decodes one player object. Entities missing an identifier or a position
/// key are rejected (the caller counts them); a present but unrecognized
/// position code still decodes, classified as `Unknown`.
pub fn parse_player(object: &Map<String, Value>, owned_default: bool) -> Option<Player> {
    let id = string_from_paths(object, PLAYER_ID_KEYS)?;
    let position_raw = string_from_paths(object, POSITION_KEYS)?;
    let position = classify(&position_raw);
    let name = string_from_paths(object, PLAYER_NAME_KEYS).unwrap_or_else(|| id.clone());
    let status = string_from_paths(object, STATUS_KEYS)
        .and_then(|raw| PlayerStatus::from_str(&raw).ok())
        .unwrap_or(PlayerStatus::Available);

    Some(Player {
        id,
        name,
        position,
        average_points: number_from_paths(object, AVERAGE_POINTS_KEYS).unwrap_or(0.0),
        total_points: integer_from_paths(object, TOTAL_POINTS_KEYS).unwrap_or(0) as i32,
        market_value: integer_from_paths(object, MARKET_VALUE_KEYS).unwrap_or(0),
        value_trend: integer_from_paths(object, VALUE_TREND_KEYS).unwrap_or(0),
        status,
        owned: bool_from_paths(object, OWNED_KEYS).unwrap_or(owned_default),
    })
}

/// Decodes one market listing. The player may sit nested under a "player"
/// key or flat on the listing object itself.
pub fn parse_listing(object: &Map<String, Value>) -> Option<MarketListing> {
    let player_object = object_get_case_insensitive(object, "player")
        .and_then(Value::as_object)
        .unwrap_or(object);
    let player = parse_player(player_object, false)?;
    let asking_price =
        integer_from_paths(object, ASKING_PRICE_KEYS).unwrap_or(player.market_value);

    Some(MarketListing {
        player,
        asking_price,
        expiry: timestamp_from_paths(object, EXPIRY_KEYS).unwrap_or_else(Utc::now),
        offer_count: integer_from_paths(object, OFFER_COUNT_KEYS).unwrap_or(0).max(0) as u32,
        seller_id: string_from_paths(object, SELLER_KEYS),
    })
}
