use crate::core::catalog::Catalog;
use crate::core::copy::generate_copy;
use crate::core::payment::payment_options;
use crate::core::pricing::price_services;
use crate::core::proposal::ProposalRenderer;
use crate::core::scheduler::build_timeline;
use crate::domain::model::{
    ClientInfo, Customization, Package, PackageSummary, PricingBlock, Proposal, Service,
};
use crate::utils::error::{PackagerError, Result};
use crate::utils::ids::generate_id;
use crate::utils::validation::Validate;
use chrono::Utc;
use std::collections::{HashMap, HashSet};

/// 套裝計算器
///
/// 目錄在建立時傳入，之後唯一的可變狀態是已建立套裝的清單（只會追加），
/// 供提案查詢與統計使用。跨執行緒共用時由呼叫端加鎖。
pub struct PackageCalculator {
    catalog: Catalog,
    renderer: ProposalRenderer,
    packages: Vec<Package>,
}

impl PackageCalculator {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            renderer: ProposalRenderer::default(),
            packages: Vec::new(),
        }
    }

    pub fn with_agency_name(mut self, agency_name: impl Into<String>) -> Self {
        self.renderer = ProposalRenderer::new(agency_name);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// 套用模板到所選服務，計算價格、時程與文案
    ///
    /// 任何錯誤都不會留下紀錄；成功時套裝會加入清單並回傳副本。
    pub fn create_package<S: AsRef<str>>(
        &mut self,
        template_id: &str,
        service_ids: &[S],
        customization: Option<&Customization>,
    ) -> Result<Package> {
        if service_ids.is_empty() {
            return Err(PackagerError::invalid_input(
                "a package needs at least one service",
            ));
        }

        let template = self.catalog.template(template_id)?;

        let mut seen = HashSet::new();
        let mut services: Vec<&Service> = Vec::with_capacity(service_ids.len());
        for id in service_ids {
            let id = id.as_ref();
            if !seen.insert(id) {
                return Err(PackagerError::invalid_input(format!(
                    "service '{}' is listed more than once",
                    id
                )));
            }
            services.push(self.catalog.service(id)?);
        }

        let strategy = template.strategy()?;
        let terms = template.terms()?;

        let start_date = customization.and_then(|c| c.start_date);
        let quote = price_services(&services, strategy, template)?;
        let timeline = build_timeline(&services, start_date)?;
        let copy = generate_copy(
            template,
            strategy,
            &services,
            self.catalog.copy_for(template_id),
            &quote,
            &timeline,
        );

        let package = Package {
            id: generate_id("pkg"),
            template_id: template.id.clone(),
            name: customization
                .and_then(|c| c.name.clone())
                .unwrap_or_else(|| template.name.clone()),
            services: services.iter().map(|s| s.id.clone()).collect(),
            pricing: PricingBlock {
                strategy,
                payment_terms: terms,
                quote,
                payment_options: payment_options(terms, quote.package_price, &timeline),
            },
            timeline,
            copy,
            created_at: Utc::now(),
        };

        tracing::info!(
            "📦 Created package {} from '{}': {} services, price {}, {} days",
            package.id,
            template_id,
            package.services.len(),
            package.pricing.quote.package_price,
            package.timeline.total_duration
        );

        self.packages.push(package.clone());
        Ok(package)
    }

    /// 為此行程中建立過的套裝產生提案
    pub fn generate_proposal(&self, package_id: &str, client: &ClientInfo) -> Result<Proposal> {
        let package = self
            .get_package(package_id)
            .ok_or_else(|| PackagerError::PackageNotFound {
                id: package_id.to_string(),
            })?;

        client.validate()?;

        let template = self.catalog.template(&package.template_id)?;
        let proposal = self.renderer.render(package, template, client);

        tracing::info!(
            "📝 Generated proposal {} for '{}'",
            proposal.id,
            client.business_name
        );
        Ok(proposal)
    }

    pub fn get_package(&self, package_id: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.id == package_id)
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// 平均價格與最常用的模板（同數時取最早使用者）
    pub fn summary(&self) -> PackageSummary {
        let total_packages = self.packages.len();
        let average_price = if total_packages > 0 {
            let total: u64 = self
                .packages
                .iter()
                .map(|p| p.pricing.quote.package_price)
                .sum();
            (total as f64 / total_packages as f64).round() as u64
        } else {
            0
        };

        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut first_seen: Vec<&str> = Vec::new();
        for package in &self.packages {
            let count = counts.entry(package.template_id.as_str()).or_insert(0);
            if *count == 0 {
                first_seen.push(package.template_id.as_str());
            }
            *count += 1;
        }

        let mut most_popular: Option<(&str, usize)> = None;
        for template_id in first_seen {
            let count = counts[template_id];
            if most_popular.map_or(true, |(_, best)| count > best) {
                most_popular = Some((template_id, count));
            }
        }

        PackageSummary {
            total_packages,
            average_price,
            most_popular_template: most_popular.map(|(id, _)| id.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::PackageTemplate;

    fn catalog() -> Catalog {
        let service = |id: &str, price: u64, days: u32, deps: &[&str]| Service {
            id: id.to_string(),
            name: id.to_uppercase(),
            base_price: price,
            setup_fee: None,
            duration_days: days,
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            synergies: Vec::new(),
            margin: 0.5,
            features: Vec::new(),
        };
        let template = |id: &str, strategy: &str| PackageTemplate {
            id: id.to_string(),
            name: format!("{} package", id),
            target_audience: "owners".to_string(),
            problem: "slow growth".to_string(),
            transformation: "faster growth".to_string(),
            pricing_strategy: strategy.to_string(),
            payment_terms: "split_50_50".to_string(),
            value_multiplier: None,
            guarantee: None,
        };

        Catalog::new(
            vec![service("a", 1000, 5, &[]), service("b", 2000, 3, &["a"])],
            vec![
                template("bundle", "bundle_discount"),
                template("speed", "premium_speed"),
            ],
            HashMap::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_duplicate_service_ids_rejected() {
        let mut calculator = PackageCalculator::new(catalog());
        let err = calculator
            .create_package("bundle", &["a", "a"], None)
            .unwrap_err();
        assert!(matches!(err, PackagerError::InvalidInput { .. }));
        assert!(calculator.packages().is_empty());
    }

    #[test]
    fn test_unknown_service_records_nothing() {
        let mut calculator = PackageCalculator::new(catalog());
        let err = calculator
            .create_package("bundle", &["a", "nope"], None)
            .unwrap_err();
        assert!(matches!(err, PackagerError::UnknownService { .. }));
        assert!(calculator.packages().is_empty());
    }

    #[test]
    fn test_customization_name_override() {
        let mut calculator = PackageCalculator::new(catalog());
        let custom = Customization {
            name: Some("Spring Relaunch".to_string()),
            start_date: None,
        };
        let package = calculator
            .create_package("bundle", &["a"], Some(&custom))
            .unwrap();
        assert_eq!(package.name, "Spring Relaunch");

        let plain = calculator.create_package("bundle", &["a"], None).unwrap();
        assert_eq!(plain.name, "bundle package");
    }

    #[test]
    fn test_summary_statistics() {
        let mut calculator = PackageCalculator::new(catalog());
        assert_eq!(calculator.summary().total_packages, 0);
        assert_eq!(calculator.summary().most_popular_template, None);

        calculator.create_package("speed", &["a"], None).unwrap(); // 1250
        calculator.create_package("bundle", &["a", "b"], None).unwrap(); // 2700
        calculator.create_package("bundle", &["b"], None).unwrap(); // 1800

        let summary = calculator.summary();
        assert_eq!(summary.total_packages, 3);
        assert_eq!(summary.average_price, 1917);
        assert_eq!(summary.most_popular_template.as_deref(), Some("bundle"));
    }

    #[test]
    fn test_summary_tie_goes_to_first_template() {
        let mut calculator = PackageCalculator::new(catalog());
        calculator.create_package("speed", &["a"], None).unwrap();
        calculator.create_package("bundle", &["a"], None).unwrap();
        assert_eq!(
            calculator.summary().most_popular_template.as_deref(),
            Some("speed")
        );
    }

    #[test]
    fn test_proposal_requires_business_name() {
        let mut calculator = PackageCalculator::new(catalog());
        let package = calculator.create_package("bundle", &["a"], None).unwrap();
        let client = ClientInfo {
            business_name: "  ".to_string(),
            industry: "retail".to_string(),
            contact_name: None,
        };
        assert!(matches!(
            calculator.generate_proposal(&package.id, &client),
            Err(PackagerError::InvalidInput { .. })
        ));
    }
}
