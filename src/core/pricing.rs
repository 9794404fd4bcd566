use crate::core::synergy::synergy_score;
use crate::domain::model::{PackageTemplate, PriceQuote, PricingStrategy, Service};
use crate::utils::error::{PackagerError, Result};

pub const BASE_BUNDLE_DISCOUNT: f64 = 0.10;
pub const MAX_SYNERGY_BONUS: f64 = 0.05;
pub const MAX_BUNDLE_DISCOUNT: f64 = 0.20;
pub const PREMIUM_POSITIONING_MARKUP: f64 = 1.15;
pub const PREMIUM_SPEED_MARKUP: f64 = 1.25;
pub const MIN_VALUE_MULTIPLIER: f64 = 2.5;
pub const MAX_VALUE_MULTIPLIER: f64 = 4.0;

/// bundle_discount 的折扣率：基本 10%，綜效最多再加 5%，上限 20%
pub fn bundle_discount_rate(synergy: f64) -> f64 {
    let bonus = synergy.clamp(0.0, 1.0) * MAX_SYNERGY_BONUS;
    (BASE_BUNDLE_DISCOUNT + bonus).min(MAX_BUNDLE_DISCOUNT)
}

/// 依模板的定價策略計算套裝價格
pub fn price_services(
    services: &[&Service],
    strategy: PricingStrategy,
    template: &PackageTemplate,
) -> Result<PriceQuote> {
    if services.is_empty() {
        return Err(PackagerError::invalid_input(
            "a package needs at least one service",
        ));
    }

    let individual_sum = services.iter().try_fold(0u64, |sum, service| {
        sum.checked_add(service.list_price()?).ok_or_else(|| {
            PackagerError::invalid_input("sum of service prices overflows")
        })
    })?;

    let (package_price, discount_rate) = match strategy {
        PricingStrategy::BundleDiscount => {
            let synergy = synergy_score(services);
            let rate = bundle_discount_rate(synergy);
            tracing::debug!(
                "Bundle discount for '{}': synergy {:.2}, rate {:.3}",
                template.id,
                synergy,
                rate
            );
            (round_money(individual_sum as f64 * (1.0 - rate)), rate)
        }
        PricingStrategy::ValueBased => {
            let multiplier = template.value_multiplier.ok_or_else(|| {
                PackagerError::invalid_input(format!(
                    "template '{}' uses value_based pricing without a value_multiplier",
                    template.id
                ))
            })?;
            // 價格 = 成本 × (1 + 毛利)，反推成本
            let total_cost: f64 = services
                .iter()
                .map(|s| s.base_price as f64 / (1.0 + s.margin))
                .sum();
            (round_money(total_cost * multiplier), 0.0)
        }
        PricingStrategy::PremiumPositioning => (
            round_money(individual_sum as f64 * PREMIUM_POSITIONING_MARKUP),
            0.0,
        ),
        PricingStrategy::PremiumSpeed => (
            round_money(individual_sum as f64 * PREMIUM_SPEED_MARKUP),
            0.0,
        ),
    };

    let savings = individual_sum.saturating_sub(package_price);
    let savings_percentage = if individual_sum > 0 {
        (savings as f64 / individual_sum as f64 * 100.0).round() as u64
    } else {
        0
    };

    Ok(PriceQuote {
        individual_sum,
        package_price,
        savings,
        savings_percentage,
        discount_rate,
    })
}

fn round_money(amount: f64) -> u64 {
    if amount.is_finite() && amount > 0.0 {
        amount.round() as u64
    } else {
        0
    }
}
