use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::directory::TeamDirectory;
use crate::lineup::LineupResult;
use crate::report::{SaleAdvice, SquadReport};
use crate::sales::SalePriority;
use crate::transfers::{ReplacementSuggestion, RiskLevel, TransferRecommendation};
use crate::types::Player;

pub fn render_lineup_table(result: &LineupResult) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Slot", "Player", "Status", "Avg", "Total", "Value"]);

    match &result.goalkeeper {
        Some(goalkeeper) => add_lineup_row(&mut table, "GK", goalkeeper),
        None => {
            table.add_row(Row::from(vec![
                Cell::new("GK"),
                Cell::new("(no goalkeeper available)").fg(Color::Red),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
            ]));
        }
    }
    for player in &result.defenders {
        add_lineup_row(&mut table, "DEF", player);
    }
    for player in &result.midfielders {
        add_lineup_row(&mut table, "MID", player);
    }
    for player in &result.forwards {
        add_lineup_row(&mut table, "FWD", player);
    }

    let mut out = table.to_string();
    out.push_str(&format!(
        "\nFormation: {}{} | total {:.1}, average {:.2}",
        result.formation.label(),
        if result.complete { "" } else { " (incomplete)" },
        result.total_score,
        result.average_score
    ));
    if !result.reserves.is_empty() {
        let bench = result
            .reserves
            .iter()
            .map(|p| format!("{} ({})", p.name, p.position))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("\nReserves: {bench}"));
    }
    out
}

fn add_lineup_row(table: &mut Table, slot: &str, player: &Player) {
    table.add_row(vec![
        slot.to_string(),
        player.name.clone(),
        player.status.to_string(),
        format!("{:.1}", player.average_points),
        player.total_points.to_string(),
        format!("{}", player.market_value),
    ]);
}

pub fn render_sales_table(advice: &[SaleAdvice]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Priority",
        "Player",
        "Pos",
        "Impact",
        "Expected Value",
        "Reasons",
        "Best Replacement",
    ]);

    for item in advice {
        let recommendation = &item.recommendation;
        let priority_cell = match recommendation.priority {
            SalePriority::High => Cell::new("HIGH").fg(Color::Red),
            SalePriority::Medium => Cell::new("MEDIUM").fg(Color::Yellow),
            SalePriority::Low => Cell::new("LOW").fg(Color::Green),
        };
        let best_replacement = item
            .replacements
            .first()
            .map(|r| {
                format!(
                    "{} ({:+.1} pts, {:+} budget)",
                    r.listing.player.name, r.performance_gain, r.budget_savings
                )
            })
            .unwrap_or_else(|| "-".to_string());
        table.add_row(Row::from(vec![
            priority_cell,
            Cell::new(recommendation.player.name.clone()),
            Cell::new(recommendation.player.position.to_string()),
            Cell::new(format!("{:?}", recommendation.lineup_impact).to_lowercase()),
            Cell::new(recommendation.expected_value.to_string()),
            Cell::new(recommendation.reasons.join("; ")),
            Cell::new(best_replacement),
        ]));
    }
    table.to_string()
}

pub fn render_replacements_table(suggestions: &[ReplacementSuggestion]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Rank",
        "Player",
        "Price",
        "Perf. Gain",
        "Budget Savings",
        "Score",
    ]);

    for (idx, suggestion) in suggestions.iter().enumerate() {
        table.add_row(vec![
            (idx + 1).to_string(),
            suggestion.listing.player.name.clone(),
            suggestion.listing.asking_price.to_string(),
            format!("{:+.1}", suggestion.performance_gain),
            format!("{:+}", suggestion.budget_savings),
            format!("{:.2}", suggestion.improvement),
        ]);
    }
    table.to_string()
}

pub fn render_transfers_table(
    recommendations: &[TransferRecommendation],
    directory: &dyn TeamDirectory,
) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Rank",
        "Player",
        "Pos",
        "Price",
        "Score",
        "Risk",
        "Priority",
        "Seller",
        "Top Driver",
    ]);

    for (idx, recommendation) in recommendations.iter().enumerate() {
        let risk_cell = match recommendation.risk {
            RiskLevel::Low => Cell::new("low").fg(Color::Green),
            RiskLevel::Medium => Cell::new("medium").fg(Color::Yellow),
            RiskLevel::High => Cell::new("high").fg(Color::Red),
        };
        let seller = recommendation
            .listing
            .seller_id
            .as_deref()
            .map(|id| directory.display_name(id).to_string())
            .unwrap_or_else(|| "-".to_string());
        let top_driver = recommendation
            .reasons
            .first()
            .map(|r| r.message.clone())
            .unwrap_or_default();
        table.add_row(Row::from(vec![
            Cell::new((idx + 1).to_string()),
            Cell::new(recommendation.listing.player.name.clone()),
            Cell::new(recommendation.listing.player.position.to_string()),
            Cell::new(recommendation.listing.asking_price.to_string()),
            Cell::new(format!("{:.3}", recommendation.score)),
            risk_cell,
            Cell::new(format!("{:?}", recommendation.priority).to_lowercase()),
            Cell::new(seller),
            Cell::new(top_driver),
        ]));
    }
    table.to_string()
}

pub fn render_report(report: &SquadReport, directory: &dyn TeamDirectory) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "League {} | budget {}\n\n== Lineup ==\n",
        report.league_id, report.budget.current
    ));
    out.push_str(&render_lineup_table(&report.lineup));
    out.push_str("\n\n== Sale candidates ==\n");
    out.push_str(&render_sales_table(&report.sales));
    out.push_str("\n\n== Transfer targets ==\n");
    out.push_str(&render_transfers_table(&report.transfers, directory));
    out
}
