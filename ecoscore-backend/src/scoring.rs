use crate::error::{AppError, Result};
use ecoscore_types::{Rating, Weights};

// Tolerance when checking that weights sum to 1.0
const WEIGHT_TOLERANCE: f64 = 0.01;

// Materials that flag a sustainability issue (substring match, lowercased)
const PROBLEM_MATERIALS: [&str; 4] = ["plastic", "pvc", "polystyrene", "styrofoam"];

// Transport modes counted as air freight (exact match, lowercased)
const AIR_TRANSPORT: [&str; 3] = ["air", "air freight", "airplane"];

// Packaging descriptions counted as non-recyclable (substring match, lowercased)
const NON_RECYCLABLE_PACKAGING: [&str; 3] = ["plastic", "mixed materials", "non-recyclable"];

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn validate_weights(weights: &Weights) -> Result<()> {
    let sum = weights.gwp + weights.circularity + weights.cost;
    if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(AppError::InvalidWeights);
    }
    Ok(())
}

/// Calculate the sustainability score for a product.
///
/// GWP is measured in kg CO2e and clamped to [0, 100] (lower is better),
/// circularity is a 0-100 score (higher is better), and cost is in USD
/// clamped to [0, 1000] (lower is better). Each is mapped to a 0-100
/// sub-score and combined with the given weights.
pub fn sustainability_score(
    gwp: f64,
    circularity: f64,
    cost: f64,
    weights: &Weights,
) -> Result<f64> {
    validate_weights(weights)?;

    let gwp_score = 100.0 - gwp.clamp(0.0, 100.0);
    let circularity_score = circularity.clamp(0.0, 100.0);
    let cost_score = 100.0 - cost.clamp(0.0, 1000.0) / 1000.0 * 100.0;

    let final_score = gwp_score * weights.gwp
        + circularity_score * weights.circularity
        + cost_score * weights.cost;

    Ok(round2(final_score))
}

pub fn rating_for(score: f64) -> Rating {
    if score >= 85.0 {
        Rating::A
    } else if score >= 70.0 {
        Rating::B
    } else if score >= 55.0 {
        Rating::C
    } else if score >= 40.0 {
        Rating::D
    } else {
        Rating::F
    }
}

/// Extract deterministic sustainability issues from product attributes.
pub fn extract_issues(materials: &[String], transport: &str, packaging: &str) -> Vec<String> {
    let mut issues = Vec::new();

    for material in materials {
        let lowered = material.to_lowercase();
        if PROBLEM_MATERIALS.iter().any(|pm| lowered.contains(pm)) {
            issues.push(format!("{} material used", material));
        }
    }

    if AIR_TRANSPORT.contains(&transport.to_lowercase().as_str()) {
        issues.push("Air transport (high emissions)".to_string());
    }

    let packaging_lowered = packaging.to_lowercase();
    if NON_RECYCLABLE_PACKAGING
        .iter()
        .any(|nr| packaging_lowered.contains(nr))
    {
        issues.push("Non-recyclable packaging".to_string());
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_with_default_weights() {
        // gwp 20 -> 80, circularity 80 -> 80, cost 100 -> 90
        // 80*0.40 + 80*0.35 + 90*0.25 = 82.5
        let score = sustainability_score(20.0, 80.0, 100.0, &Weights::default()).unwrap();
        assert_eq!(score, 82.5);
    }

    #[test]
    fn inputs_are_clamped_to_their_ranges() {
        // gwp 150 -> clamped 100 -> sub-score 0, circularity -5 -> 0,
        // cost 2000 -> clamped 1000 -> sub-score 0
        let score = sustainability_score(150.0, -5.0, 2000.0, &Weights::default()).unwrap();
        assert_eq!(score, 0.0);

        let score = sustainability_score(-10.0, 120.0, -50.0, &Weights::default()).unwrap();
        assert_eq!(score, 100.0);
    }

    #[test]
    fn score_is_rounded_to_two_decimals() {
        let weights = Weights {
            gwp: 0.34,
            circularity: 0.33,
            cost: 0.33,
        };
        let score = sustainability_score(33.3, 66.6, 123.4, &weights).unwrap();
        assert_eq!(score, round2(score));
    }

    #[test]
    fn weights_must_sum_to_one() {
        let weights = Weights {
            gwp: 0.5,
            circularity: 0.5,
            cost: 0.5,
        };
        let err = sustainability_score(10.0, 50.0, 100.0, &weights).unwrap_err();
        assert!(matches!(err, AppError::InvalidWeights));
    }

    #[test]
    fn weights_within_tolerance_are_accepted() {
        let weights = Weights {
            gwp: 0.40,
            circularity: 0.35,
            cost: 0.255,
        };
        assert!(validate_weights(&weights).is_ok());
    }

    #[test]
    fn rating_thresholds() {
        assert_eq!(rating_for(85.0), Rating::A);
        assert_eq!(rating_for(84.99), Rating::B);
        assert_eq!(rating_for(70.0), Rating::B);
        assert_eq!(rating_for(55.0), Rating::C);
        assert_eq!(rating_for(40.0), Rating::D);
        assert_eq!(rating_for(39.99), Rating::F);
    }

    #[test]
    fn problem_materials_are_flagged() {
        let materials = vec!["Recycled PVC".to_string(), "Bamboo".to_string()];
        let issues = extract_issues(&materials, "ship", "cardboard");
        assert_eq!(issues, vec!["Recycled PVC material used".to_string()]);
    }

    #[test]
    fn air_transport_is_flagged() {
        let issues = extract_issues(&[], "Air Freight", "cardboard");
        assert_eq!(issues, vec!["Air transport (high emissions)".to_string()]);

        // Substring is not enough, the transport mode must match exactly
        let issues = extract_issues(&[], "airship", "cardboard");
        assert!(issues.is_empty());
    }

    #[test]
    fn non_recyclable_packaging_is_flagged() {
        let issues = extract_issues(&[], "ship", "Plastic shrink wrap");
        assert_eq!(issues, vec!["Non-recyclable packaging".to_string()]);
    }

    #[test]
    fn clean_product_has_no_issues() {
        let materials = vec!["Organic cotton".to_string()];
        let issues = extract_issues(&materials, "rail", "recycled cardboard");
        assert!(issues.is_empty());
    }
}
