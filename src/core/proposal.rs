use crate::domain::model::{ClientInfo, Package, PackageTemplate, Proposal, ProposalSections};
use crate::utils::ids::generate_id;
use crate::utils::money::format_money;
use chrono::{Days, NaiveDate, Utc};

pub const DEFAULT_AGENCY_NAME: &str = "Our agency";
pub const PROPOSAL_VALIDITY_DAYS: u64 = 30;

/// 將套裝與客戶資料組成提案文字，不做任何新的計算
#[derive(Debug, Clone)]
pub struct ProposalRenderer {
    agency_name: String,
}

impl Default for ProposalRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_AGENCY_NAME)
    }
}

impl ProposalRenderer {
    pub fn new(agency_name: impl Into<String>) -> Self {
        Self {
            agency_name: agency_name.into(),
        }
    }

    pub fn render(
        &self,
        package: &Package,
        template: &PackageTemplate,
        client: &ClientInfo,
    ) -> Proposal {
        let created_at = Utc::now();
        let valid_until = created_at
            .date_naive()
            .checked_add_days(Days::new(PROPOSAL_VALIDITY_DAYS))
            .unwrap_or(NaiveDate::MAX);

        let sections = ProposalSections {
            executive_summary: self.executive_summary(package, client),
            problem_statement: format!(
                "Like many {} businesses, {} faces a familiar challenge: {}",
                client.industry, client.business_name, template.problem
            ),
            solution: solution(package),
            investment: investment(package),
            timeline: timeline(package),
            next_steps: format!(
                "Approve this proposal before {} to reserve your start date. {} will confirm \
                 the kickoff call and send the first invoice.",
                valid_until, self.agency_name
            ),
        };

        Proposal {
            id: generate_id("prop"),
            package_id: package.id.clone(),
            client: client.clone(),
            created_at,
            valid_until,
            sections,
        }
    }

    fn executive_summary(&self, package: &Package, client: &ClientInfo) -> String {
        let greeting = match &client.contact_name {
            Some(name) => format!("Prepared for {} at {}. ", name, client.business_name),
            None => format!("Prepared for {}. ", client.business_name),
        };
        format!(
            "{}{} proposes the {} for {}, a {} business. {}. The engagement covers {} \
             services delivered over {} days for an investment of {}.",
            greeting,
            self.agency_name,
            package.name,
            client.business_name,
            client.industry,
            package.copy.headline,
            package.services.len(),
            package.timeline.total_duration,
            format_money(package.pricing.quote.package_price)
        )
    }
}

fn solution(package: &Package) -> String {
    let mut text = package.copy.value_proposition.clone();
    for feature in &package.copy.features {
        text.push_str(&format!("\n- {}", feature));
    }
    text
}

fn investment(package: &Package) -> String {
    let quote = &package.pricing.quote;
    let mut text = format!("Package investment: {}", format_money(quote.package_price));
    if quote.savings > 0 {
        text.push_str(&format!(
            " (you save {}, {}% off the individual price of {})",
            format_money(quote.savings),
            quote.savings_percentage,
            format_money(quote.individual_sum)
        ));
    }
    for option in &package.pricing.payment_options {
        text.push_str(&format!("\n- {}:", option.label));
        for installment in &option.installments {
            text.push_str(&format!(
                " {} {} (day {});",
                installment.label,
                format_money(installment.amount),
                installment.due_day
            ));
        }
    }
    text
}

fn timeline(package: &Package) -> String {
    let timeline = &package.timeline;
    let mut text = format!("Total duration: {} days", timeline.total_duration);
    if let (Some(start), Some(end)) = (timeline.start_date, timeline.end_date) {
        text.push_str(&format!(" ({} to {})", start, end));
    }
    for entry in &timeline.schedule {
        text.push_str(&format!(
            "\n- Day {}-{}: {}",
            entry.start_day, entry.end_day, entry.name
        ));
    }
    for milestone in &timeline.milestones {
        text.push_str(&format!(
            "\n- {}% by day {}: {} service(s) complete",
            milestone.percentage,
            milestone.day,
            milestone.completed.len()
        ));
    }
    text
}

impl Proposal {
    pub fn to_markdown(&self) -> String {
        let s = &self.sections;
        format!(
            "# Proposal for {}\n\n\
             _Proposal {} · valid until {}_\n\n\
             ## Executive Summary\n\n{}\n\n\
             ## The Challenge\n\n{}\n\n\
             ## Our Solution\n\n{}\n\n\
             ## Investment\n\n{}\n\n\
             ## Timeline\n\n{}\n\n\
             ## Next Steps\n\n{}\n",
            self.client.business_name,
            self.id,
            self.valid_until,
            s.executive_summary,
            s.problem_statement,
            s.solution,
            s.investment,
            s.timeline,
            s.next_steps
        )
    }
}
