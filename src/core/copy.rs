use crate::domain::model::{
    CopyTemplate, MarketingCopy, PackageTemplate, PriceQuote, PricingStrategy, Service, Timeline,
};
use crate::utils::money::format_money;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").expect("placeholder pattern is valid"));

const DEFAULT_SUBHEADLINE: &str = "{services} delivered in {duration} days for {price}";
const DEFAULT_GUARANTEE: &str =
    "100% satisfaction guarantee: we keep revising until every deliverable is approved";
const SPEED_GUARANTEE: &str =
    "Delivered in {duration} days or we refund the rush premium";

/// 以 `{name}` 插值；未知的 placeholder 原樣保留
pub fn render_pattern(pattern: &str, vars: &HashMap<&str, String>) -> String {
    PLACEHOLDER
        .replace_all(pattern, |caps: &Captures| {
            vars.get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// 文案插值可用的變數
pub fn copy_variables(
    template: &PackageTemplate,
    services: &[&Service],
    quote: &PriceQuote,
    timeline: &Timeline,
) -> HashMap<&'static str, String> {
    let names: Vec<&str> = services.iter().map(|s| s.name.as_str()).collect();

    HashMap::from([
        ("template", template.name.clone()),
        ("audience", template.target_audience.clone()),
        ("problem", template.problem.clone()),
        ("transformation", template.transformation.clone()),
        ("price", format_money(quote.package_price)),
        ("individual_sum", format_money(quote.individual_sum)),
        ("savings", format_money(quote.savings)),
        ("savings_percentage", quote.savings_percentage.to_string()),
        ("duration", timeline.total_duration.to_string()),
        ("service_count", services.len().to_string()),
        ("services", names.join(", ")),
    ])
}

fn strategy_benefit(strategy: PricingStrategy) -> &'static str {
    match strategy {
        PricingStrategy::BundleDiscount => "One coordinated team across every deliverable",
        PricingStrategy::ValueBased => "Priced on the outcome you get, not the hours we log",
        PricingStrategy::PremiumPositioning => "Senior strategists assigned to every deliverable",
        PricingStrategy::PremiumSpeed => "Priority scheduling with a dedicated delivery team",
    }
}

fn strategy_guarantee(strategy: PricingStrategy) -> &'static str {
    match strategy {
        PricingStrategy::PremiumSpeed => SPEED_GUARANTEE,
        _ => DEFAULT_GUARANTEE,
    }
}

/// 產生套裝的行銷文案，缺少樣板時使用通用文字，不會失敗
pub fn generate_copy(
    template: &PackageTemplate,
    strategy: PricingStrategy,
    services: &[&Service],
    copy: Option<&CopyTemplate>,
    quote: &PriceQuote,
    timeline: &Timeline,
) -> MarketingCopy {
    let vars = copy_variables(template, services, quote, timeline);
    let pick = |field: Option<&String>, fallback: &str| match field {
        Some(pattern) => render_pattern(pattern, &vars),
        None => render_pattern(fallback, &vars),
    };

    if copy.is_none() {
        tracing::debug!("No copy template for '{}', using fallback copy", template.id);
    }

    let headline = match copy.and_then(|c| c.headline.as_ref()) {
        Some(pattern) => render_pattern(pattern, &vars),
        None => format!("Transform Your Business with Our {}", template.name),
    };
    let subheadline = pick(copy.and_then(|c| c.subheadline.as_ref()), DEFAULT_SUBHEADLINE);
    let value_proposition = pick(
        copy.and_then(|c| c.value_proposition.as_ref()),
        template.transformation.as_str(),
    );
    let guarantee = pick(
        copy.and_then(|c| c.guarantee.as_ref())
            .or(template.guarantee.as_ref()),
        strategy_guarantee(strategy),
    );

    let features = services
        .iter()
        .map(|s| {
            if s.features.is_empty() {
                format!("{} ({} days)", s.name, s.duration_days)
            } else {
                format!("{} ({} days): {}", s.name, s.duration_days, s.features.join(", "))
            }
        })
        .collect();

    let mut benefits = vec![template.transformation.clone()];
    if quote.savings > 0 {
        benefits.push(format!(
            "Save {} ({}%) compared to buying each service separately",
            format_money(quote.savings),
            quote.savings_percentage
        ));
    }
    benefits.push(format!(
        "Everything delivered in {} days",
        timeline.total_duration
    ));
    benefits.push(strategy_benefit(strategy).to_string());

    MarketingCopy {
        headline,
        subheadline,
        value_proposition,
        features,
        benefits,
        guarantee,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures() -> (PackageTemplate, Service, PriceQuote, Timeline) {
        let template = PackageTemplate {
            id: "launch".to_string(),
            name: "Launch Kit".to_string(),
            target_audience: "new founders".to_string(),
            problem: "nobody knows you exist".to_string(),
            transformation: "A brand customers remember".to_string(),
            pricing_strategy: "bundle_discount".to_string(),
            payment_terms: "upfront".to_string(),
            value_multiplier: None,
            guarantee: None,
        };
        let service = Service {
            id: "brand".to_string(),
            name: "Brand Identity".to_string(),
            base_price: 3000,
            setup_fee: None,
            duration_days: 8,
            dependencies: Vec::new(),
            synergies: Vec::new(),
            margin: 0.5,
            features: vec!["Logo".to_string(), "Palette".to_string()],
        };
        let quote = PriceQuote {
            individual_sum: 3000,
            package_price: 2700,
            savings: 300,
            savings_percentage: 10,
            discount_rate: 0.1,
        };
        let timeline = Timeline {
            total_duration: 8,
            schedule: Vec::new(),
            critical_path: Vec::new(),
            milestones: Vec::new(),
            start_date: None,
            end_date: None,
        };
        (template, service, quote, timeline)
    }

    #[test]
    fn test_render_pattern_keeps_unknown_placeholders() {
        let vars = HashMap::from([("price", "$10".to_string())]);
        assert_eq!(
            render_pattern("Only {price} with {bonus}", &vars),
            "Only $10 with {bonus}"
        );
    }

    #[test]
    fn test_fallback_copy_without_template() {
        let (template, service, quote, timeline) = fixtures();
        let copy = generate_copy(
            &template,
            PricingStrategy::BundleDiscount,
            &[&service],
            None,
            &quote,
            &timeline,
        );

        assert_eq!(copy.headline, "Transform Your Business with Our Launch Kit");
        assert_eq!(copy.subheadline, "Brand Identity delivered in 8 days for $2,700");
        assert_eq!(copy.value_proposition, "A brand customers remember");
        assert_eq!(copy.features, vec!["Brand Identity (8 days): Logo, Palette"]);
        assert!(copy.benefits.iter().any(|b| b.contains("Save $300 (10%)")));
        assert!(copy.guarantee.starts_with("100% satisfaction"));
    }

    #[test]
    fn test_copy_template_is_interpolated() {
        let (template, service, quote, timeline) = fixtures();
        let copy_template = CopyTemplate {
            headline: Some("{template} for {audience}".to_string()),
            subheadline: None,
            value_proposition: Some("Stop worrying that {problem}".to_string()),
            guarantee: Some("Live in {duration} days".to_string()),
        };
        let copy = generate_copy(
            &template,
            PricingStrategy::BundleDiscount,
            &[&service],
            Some(&copy_template),
            &quote,
            &timeline,
        );

        assert_eq!(copy.headline, "Launch Kit for new founders");
        assert_eq!(copy.value_proposition, "Stop worrying that nobody knows you exist");
        assert_eq!(copy.guarantee, "Live in 8 days");
    }

    #[test]
    fn test_speed_guarantee_and_template_guarantee() {
        let (mut template, service, quote, timeline) = fixtures();
        let copy = generate_copy(
            &template,
            PricingStrategy::PremiumSpeed,
            &[&service],
            None,
            &quote,
            &timeline,
        );
        assert_eq!(copy.guarantee, "Delivered in 8 days or we refund the rush premium");

        template.guarantee = Some("Money back within {duration} days".to_string());
        let copy = generate_copy(
            &template,
            PricingStrategy::PremiumSpeed,
            &[&service],
            None,
            &quote,
            &timeline,
        );
        assert_eq!(copy.guarantee, "Money back within 8 days");
    }
}
