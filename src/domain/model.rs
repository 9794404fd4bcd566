use crate::utils::error::{PackagerError, Result};
use crate::utils::validation::Validate;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 目錄中的一項服務，載入後不再變動
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub base_price: u64,
    pub setup_fee: Option<u64>,
    pub duration_days: u32,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub synergies: Vec<String>,
    pub margin: f64,
    #[serde(default)]
    pub features: Vec<String>,
}

impl Service {
    /// 基本價格加上一次性設定費
    pub fn list_price(&self) -> Result<u64> {
        self.base_price
            .checked_add(self.setup_fee.unwrap_or(0))
            .ok_or_else(|| {
                PackagerError::invalid_input(format!(
                    "list price of service '{}' overflows",
                    self.id
                ))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageTemplate {
    pub id: String,
    pub name: String,
    pub target_audience: String,
    pub problem: String,
    pub transformation: String,
    /// bundle_discount / value_based / premium_positioning / premium_speed
    pub pricing_strategy: String,
    /// upfront / split_50_50 / milestone / monthly
    pub payment_terms: String,
    pub value_multiplier: Option<f64>,
    pub guarantee: Option<String>,
}

impl PackageTemplate {
    pub fn strategy(&self) -> Result<PricingStrategy> {
        self.pricing_strategy
            .parse::<PricingStrategy>()
            .map_err(|e| PackagerError::invalid_input(format!("template '{}': {}", self.id, e)))
    }

    pub fn terms(&self) -> Result<PaymentTerms> {
        self.payment_terms
            .parse::<PaymentTerms>()
            .map_err(|e| PackagerError::invalid_input(format!("template '{}': {}", self.id, e)))
    }
}

/// 各模板的行銷文案樣板，支援 `{placeholder}` 插值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CopyTemplate {
    pub headline: Option<String>,
    pub subheadline: Option<String>,
    pub value_proposition: Option<String>,
    pub guarantee: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingStrategy {
    BundleDiscount,
    ValueBased,
    PremiumPositioning,
    PremiumSpeed,
}

impl PricingStrategy {
    pub const TAGS: [&'static str; 4] = [
        "bundle_discount",
        "value_based",
        "premium_positioning",
        "premium_speed",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PricingStrategy::BundleDiscount => "bundle_discount",
            PricingStrategy::ValueBased => "value_based",
            PricingStrategy::PremiumPositioning => "premium_positioning",
            PricingStrategy::PremiumSpeed => "premium_speed",
        }
    }
}

impl FromStr for PricingStrategy {
    type Err = String;

    fn from_str(tag: &str) -> std::result::Result<Self, Self::Err> {
        match tag {
            "bundle_discount" => Ok(PricingStrategy::BundleDiscount),
            "value_based" => Ok(PricingStrategy::ValueBased),
            "premium_positioning" => Ok(PricingStrategy::PremiumPositioning),
            "premium_speed" => Ok(PricingStrategy::PremiumSpeed),
            other => Err(format!("unknown pricing strategy '{}'", other)),
        }
    }
}

impl fmt::Display for PricingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentTerms {
    Upfront,
    #[serde(rename = "split_50_50")]
    Split5050,
    Milestone,
    Monthly,
}

impl PaymentTerms {
    pub const TAGS: [&'static str; 4] = ["upfront", "split_50_50", "milestone", "monthly"];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentTerms::Upfront => "upfront",
            PaymentTerms::Split5050 => "split_50_50",
            PaymentTerms::Milestone => "milestone",
            PaymentTerms::Monthly => "monthly",
        }
    }
}

impl FromStr for PaymentTerms {
    type Err = String;

    fn from_str(tag: &str) -> std::result::Result<Self, Self::Err> {
        match tag {
            "upfront" => Ok(PaymentTerms::Upfront),
            "split_50_50" => Ok(PaymentTerms::Split5050),
            "milestone" => Ok(PaymentTerms::Milestone),
            "monthly" => Ok(PaymentTerms::Monthly),
            other => Err(format!("unknown payment terms '{}'", other)),
        }
    }
}

/// 建立套裝時的客製化選項
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customization {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
}

/// 定價策略的計算結果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub individual_sum: u64,
    pub package_price: u64,
    pub savings: u64,
    pub savings_percentage: u64,
    /// 只有 bundle_discount 會套用折扣率，其餘策略為 0
    pub discount_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub label: String,
    pub amount: u64,
    pub due_day: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOption {
    pub label: String,
    pub installments: Vec<Installment>,
}

impl PaymentOption {
    pub fn total(&self) -> u64 {
        self.installments.iter().map(|i| i.amount).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingBlock {
    pub strategy: PricingStrategy,
    pub payment_terms: PaymentTerms,
    #[serde(flatten)]
    pub quote: PriceQuote,
    pub payment_options: Vec<PaymentOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledService {
    pub service_id: String,
    pub name: String,
    pub start_day: u32,
    pub end_day: u32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub percentage: u32,
    pub day: u32,
    pub date: Option<NaiveDate>,
    pub completed: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    pub total_duration: u32,
    pub schedule: Vec<ScheduledService>,
    pub critical_path: Vec<String>,
    pub milestones: Vec<Milestone>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Timeline {
    pub fn entry(&self, service_id: &str) -> Option<&ScheduledService> {
        self.schedule.iter().find(|s| s.service_id == service_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketingCopy {
    pub headline: String,
    pub subheadline: String,
    pub value_proposition: String,
    pub features: Vec<String>,
    pub benefits: Vec<String>,
    pub guarantee: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: String,
    pub template_id: String,
    pub name: String,
    pub services: Vec<String>,
    pub pricing: PricingBlock,
    pub timeline: Timeline,
    pub copy: MarketingCopy,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub business_name: String,
    pub industry: String,
    pub contact_name: Option<String>,
}

impl Validate for ClientInfo {
    fn validate(&self) -> Result<()> {
        if self.business_name.trim().is_empty() {
            return Err(PackagerError::invalid_input(
                "client business name cannot be empty",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalSections {
    pub executive_summary: String,
    pub problem_statement: String,
    pub solution: String,
    pub investment: String,
    pub timeline: String,
    pub next_steps: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: String,
    pub package_id: String,
    pub client: ClientInfo,
    pub created_at: DateTime<Utc>,
    pub valid_until: NaiveDate,
    pub sections: ProposalSections,
}

/// 已建立套裝的統計
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSummary {
    pub total_packages: usize,
    pub average_price: u64,
    pub most_popular_template: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(strategy: &str, terms: &str) -> PackageTemplate {
        PackageTemplate {
            id: "tpl".to_string(),
            name: "Test Package".to_string(),
            target_audience: "founders".to_string(),
            problem: "no brand".to_string(),
            transformation: "a brand".to_string(),
            pricing_strategy: strategy.to_string(),
            payment_terms: terms.to_string(),
            value_multiplier: None,
            guarantee: None,
        }
    }

    #[test]
    fn test_template_tags_parse() {
        let tpl = template("premium_speed", "split_50_50");
        assert_eq!(tpl.strategy().unwrap(), PricingStrategy::PremiumSpeed);
        assert_eq!(tpl.terms().unwrap(), PaymentTerms::Split5050);
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        let err = template("pay_what_you_want", "upfront").strategy().unwrap_err();
        assert!(matches!(err, PackagerError::InvalidInput { .. }));
        assert!(err.to_string().contains("pay_what_you_want"));
        assert!(template("bundle_discount", "weekly").terms().is_err());
    }

    #[test]
    fn test_list_price_overflow_is_an_error() {
        let service = Service {
            id: "huge".to_string(),
            name: "Huge".to_string(),
            base_price: u64::MAX,
            setup_fee: Some(1),
            duration_days: 1,
            dependencies: Vec::new(),
            synergies: Vec::new(),
            margin: 0.5,
            features: Vec::new(),
        };
        assert!(matches!(
            service.list_price(),
            Err(PackagerError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_client_validation() {
        let mut client = ClientInfo {
            business_name: "Acme Bakery".to_string(),
            industry: "food service".to_string(),
            contact_name: None,
        };
        assert!(client.validate().is_ok());
        client.business_name = "   ".to_string();
        assert!(matches!(
            client.validate(),
            Err(PackagerError::InvalidInput { .. })
        ));
    }
}
