use crate::core::pricing::{MAX_VALUE_MULTIPLIER, MIN_VALUE_MULTIPLIER};
use crate::core::scheduler::dependency_order;
use crate::domain::model::{CopyTemplate, PackageTemplate, PaymentTerms, PricingStrategy, Service};
use crate::domain::ports::CatalogProvider;
use crate::utils::error::{PackagerError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_positive_number, validate_range,
    validate_required_field, validate_unique_ids,
};
use std::collections::HashMap;

/// 單一服務的工期上限（約十年）
pub const MAX_DURATION_DAYS: u32 = 3650;

/// 以識別碼索引的服務與模板目錄
///
/// 建立時即完成所有一致性檢查（相依存在、無循環、標籤合法），
/// 之後計算過程只需依 id 查表。
#[derive(Debug, Clone)]
pub struct Catalog {
    services: HashMap<String, Service>,
    service_order: Vec<String>,
    templates: HashMap<String, PackageTemplate>,
    template_order: Vec<String>,
    copy: HashMap<String, CopyTemplate>,
}

impl Catalog {
    pub fn new(
        services: Vec<Service>,
        templates: Vec<PackageTemplate>,
        copy: HashMap<String, CopyTemplate>,
    ) -> Result<Self> {
        validate_unique_ids("services.id", services.iter().map(|s| s.id.as_str()))?;
        validate_unique_ids("templates.id", templates.iter().map(|t| t.id.as_str()))?;

        for service in &services {
            validate_service(service, &services)?;
        }
        for template in &templates {
            validate_template(template)?;
        }

        let all: Vec<&Service> = services.iter().collect();
        dependency_order(&all)?;

        for key in copy.keys() {
            if !templates.iter().any(|t| &t.id == key) {
                tracing::warn!("Copy template '{}' does not match any package template", key);
            }
        }

        let service_order = services.iter().map(|s| s.id.clone()).collect();
        let template_order = templates.iter().map(|t| t.id.clone()).collect();

        tracing::debug!(
            "Catalog loaded: {} services, {} templates",
            services.len(),
            templates.len()
        );

        Ok(Self {
            services: services.into_iter().map(|s| (s.id.clone(), s)).collect(),
            service_order,
            templates: templates.into_iter().map(|t| (t.id.clone(), t)).collect(),
            template_order,
            copy,
        })
    }

    pub fn from_provider<P: CatalogProvider + ?Sized>(provider: &P) -> Result<Self> {
        Self::new(
            provider.services().to_vec(),
            provider.templates().to_vec(),
            provider.copy_templates().clone(),
        )
    }

    pub fn service(&self, id: &str) -> Result<&Service> {
        self.services
            .get(id)
            .ok_or_else(|| PackagerError::UnknownService { id: id.to_string() })
    }

    pub fn template(&self, id: &str) -> Result<&PackageTemplate> {
        self.templates
            .get(id)
            .ok_or_else(|| PackagerError::UnknownTemplate { id: id.to_string() })
    }

    pub fn copy_for(&self, template_id: &str) -> Option<&CopyTemplate> {
        self.copy.get(template_id)
    }

    /// 依目錄檔中的順序列出服務
    pub fn services(&self) -> impl Iterator<Item = &Service> {
        self.service_order.iter().filter_map(|id| self.services.get(id))
    }

    pub fn templates(&self) -> impl Iterator<Item = &PackageTemplate> {
        self.template_order
            .iter()
            .filter_map(|id| self.templates.get(id))
    }
}

fn validate_service(service: &Service, all: &[Service]) -> Result<()> {
    validate_non_empty_string("services.id", &service.id)?;
    validate_non_empty_string(&format!("services.{}.name", service.id), &service.name)?;
    validate_positive_number(
        &format!("services.{}.duration_days", service.id),
        u64::from(service.duration_days),
        1,
    )?;
    if service.duration_days > MAX_DURATION_DAYS {
        return Err(PackagerError::InvalidConfigValueError {
            field: format!("services.{}.duration_days", service.id),
            value: service.duration_days.to_string(),
            reason: format!("Value must be at most {}", MAX_DURATION_DAYS),
        });
    }
    service.list_price().map_err(|e| PackagerError::ConfigValidationError {
        field: format!("services.{}.base_price", service.id),
        message: e.to_string(),
    })?;
    validate_range(
        &format!("services.{}.margin", service.id),
        service.margin,
        0.0,
        1.0,
    )?;

    for dep in &service.dependencies {
        if !all.iter().any(|s| &s.id == dep) {
            return Err(PackagerError::ConfigValidationError {
                field: format!("services.{}.dependencies", service.id),
                message: format!("Dependency service '{}' not found", dep),
            });
        }
    }

    for synergy in &service.synergies {
        if !all.iter().any(|s| &s.id == synergy) {
            tracing::warn!(
                "Service '{}' lists unknown synergy '{}'; it will never match",
                service.id,
                synergy
            );
        }
    }

    Ok(())
}

fn validate_template(template: &PackageTemplate) -> Result<()> {
    validate_non_empty_string("templates.id", &template.id)?;
    validate_non_empty_string(&format!("templates.{}.name", template.id), &template.name)?;
    validate_one_of(
        &format!("templates.{}.pricing_strategy", template.id),
        &template.pricing_strategy,
        &PricingStrategy::TAGS,
    )?;
    validate_one_of(
        &format!("templates.{}.payment_terms", template.id),
        &template.payment_terms,
        &PaymentTerms::TAGS,
    )?;

    let multiplier_field = format!("templates.{}.value_multiplier", template.id);
    if template.pricing_strategy == PricingStrategy::ValueBased.as_str() {
        validate_required_field(&multiplier_field, &template.value_multiplier)?;
    }
    if let Some(multiplier) = template.value_multiplier {
        validate_range(
            &multiplier_field,
            multiplier,
            MIN_VALUE_MULTIPLIER,
            MAX_VALUE_MULTIPLIER,
        )?;
    }

    Ok(())
}
