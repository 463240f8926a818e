use anyhow::Result;

use crate::report::SaleAdvice;
use crate::transfers::TransferRecommendation;

pub fn sales_to_csv(advice: &[SaleAdvice]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "player_id",
        "player",
        "position",
        "priority",
        "lineup_impact",
        "expected_value",
        "reasons",
        "best_replacement",
    ])?;
    for item in advice {
        let recommendation = &item.recommendation;
        writer.write_record([
            recommendation.player.id.clone(),
            recommendation.player.name.clone(),
            recommendation.player.position.to_string(),
            format!("{:?}", recommendation.priority).to_lowercase(),
            format!("{:?}", recommendation.lineup_impact).to_lowercase(),
            recommendation.expected_value.to_string(),
            recommendation.reasons.join("; "),
            item.replacements
                .first()
                .map(|r| r.listing.player.name.clone())
                .unwrap_or_default(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn transfers_to_csv(recommendations: &[TransferRecommendation]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "player_id",
        "player",
        "position",
        "asking_price",
        "score",
        "risk",
        "priority",
        "top_reason",
    ])?;
    for recommendation in recommendations {
        writer.write_record([
            recommendation.listing.player.id.clone(),
            recommendation.listing.player.name.clone(),
            recommendation.listing.player.position.to_string(),
            recommendation.listing.asking_price.to_string(),
            format!("{:.4}", recommendation.score),
            format!("{:?}", recommendation.risk).to_lowercase(),
            format!("{:?}", recommendation.priority).to_lowercase(),
            recommendation
                .reasons
                .first()
                .map(|r| r.message.clone())
                .unwrap_or_default(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}
