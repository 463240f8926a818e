use crate::config::ReplacementsConfig;
use crate::transfers::ReplacementSuggestion;
use crate::types::{Budget, MarketListing, Metric, Player};

/// Finds market substitutes for a player being sold: same position, not
/// already on the roster, and affordable once the sale proceeds land. The
/// full ranked list comes back so callers can show alternatives past the top
/// pick. Roster membership is checked by id because listings decode with
/// `owned` defaulting to false even when the seller is us.
pub fn find_replacements(
    sold: &Player,
    expected_value: i64,
    market: &[MarketListing],
    roster: &[Player],
    budget: Budget,
    metric: Metric,
    config: &ReplacementsConfig,
) -> Vec<ReplacementSuggestion> {
    let ceiling = budget.current + expected_value;
    let sold_score = metric.value_of(sold);

    let mut suggestions: Vec<ReplacementSuggestion> = market
        .iter()
        .filter(|listing| {
            listing.player.position == sold.position
                && !listing.player.owned
                && !roster.iter().any(|p| p.id == listing.player.id)
                && listing.asking_price <= ceiling
        })
        .map(|listing| {
            let performance_gain = metric.value_of(&listing.player) - sold_score;
            let budget_savings = expected_value - listing.asking_price;
            // Spending past the sale proceeds costs points on the score.
            let overspend_millions =
                (listing.asking_price - expected_value).max(0) as f64 / 1_000_000.0;
            let improvement =
                performance_gain - overspend_millions * config.price_penalty_per_million;
            ReplacementSuggestion {
                listing: listing.clone(),
                performance_gain,
                budget_savings,
                improvement,
            }
        })
        .collect();

    suggestions.sort_by(|a, b| {
        b.improvement
            .total_cmp(&a.improvement)
            .then_with(|| a.listing.asking_price.cmp(&b.listing.asking_price))
    });
    suggestions
}
