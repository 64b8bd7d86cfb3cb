use crate::config::DigitsConfig;

/// Currency earned for a run's final score.
pub fn calculate_money_reward(score: u64, config: &DigitsConfig) -> u64 {
    score * config.money_per_point
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reward_scales_with_score() {
        let config = DigitsConfig {
            money_per_point: 3,
            ..DigitsConfig::default()
        };
        assert_eq!(calculate_money_reward(0, &config), 0);
        assert_eq!(calculate_money_reward(41, &config), 123);
    }
}
