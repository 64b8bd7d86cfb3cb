use crate::config::DodgeConfig;

/// Currency earned for a run: one payout per wall passed.
pub fn calculate_money_reward(walls_passed: u32, config: &DodgeConfig) -> u64 {
    u64::from(walls_passed) * config.money_per_wall
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_walls_pays_nothing() {
        assert_eq!(calculate_money_reward(0, &DodgeConfig::default()), 0);
    }

    #[test]
    fn reward_is_exact_product() {
        let config = DodgeConfig {
            money_per_wall: 7,
            ..DodgeConfig::default()
        };
        assert_eq!(calculate_money_reward(13, &config), 91);
        assert_eq!(calculate_money_reward(u32::MAX, &config), u64::from(u32::MAX) * 7);
    }
}
