use crate::domain::model::{Installment, PaymentOption, PaymentTerms, Timeline};

const DAYS_PER_MONTH: u32 = 30;

/// 依付款條件拆分分期，每個選項的分期總和都等於套裝價格
pub fn payment_options(terms: PaymentTerms, price: u64, timeline: &Timeline) -> Vec<PaymentOption> {
    let mut options = vec![PaymentOption {
        label: "Pay in full".to_string(),
        installments: vec![Installment {
            label: "Full payment".to_string(),
            amount: price,
            due_day: 0,
        }],
    }];

    match terms {
        PaymentTerms::Upfront => {}
        PaymentTerms::Split5050 => {
            let balance = price / 2;
            options.push(PaymentOption {
                label: "50% deposit, 50% on completion".to_string(),
                installments: vec![
                    Installment {
                        label: "Deposit".to_string(),
                        amount: price - balance,
                        due_day: 0,
                    },
                    Installment {
                        label: "Balance on completion".to_string(),
                        amount: balance,
                        due_day: timeline.total_duration,
                    },
                ],
            });
        }
        PaymentTerms::Milestone => {
            let due_days: Vec<(String, u32)> = timeline
                .milestones
                .iter()
                .map(|m| (format!("{}% milestone", m.percentage), m.day))
                .collect();
            options.push(PaymentOption {
                label: "Pay per milestone".to_string(),
                installments: split_evenly(price, due_days),
            });
        }
        PaymentTerms::Monthly => {
            let months = timeline.total_duration.div_ceil(DAYS_PER_MONTH).max(1);
            let due_days = (0..months)
                .map(|i| (format!("Month {}", i + 1), i * DAYS_PER_MONTH))
                .collect();
            options.push(PaymentOption {
                label: format!("{} monthly payments", months),
                installments: split_evenly(price, due_days),
            });
        }
    }

    options
}

/// 平均分配，餘數併入最後一期
fn split_evenly(price: u64, due_days: Vec<(String, u32)>) -> Vec<Installment> {
    let count = due_days.len() as u64;
    if count == 0 {
        return Vec::new();
    }
    let share = price / count;
    let remainder = price - share * count;
    let last = due_days.len() - 1;

    due_days
        .into_iter()
        .enumerate()
        .map(|(i, (label, due_day))| Installment {
            label,
            amount: if i == last { share + remainder } else { share },
            due_day,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Milestone;

    fn timeline(total_duration: u32) -> Timeline {
        let milestones = [25u32, 50, 75, 100]
            .iter()
            .map(|p| Milestone {
                percentage: *p,
                day: (total_duration as f64 * *p as f64 / 100.0).round() as u32,
                date: None,
                completed: Vec::new(),
            })
            .collect();
        Timeline {
            total_duration,
            schedule: Vec::new(),
            critical_path: Vec::new(),
            milestones,
            start_date: None,
            end_date: None,
        }
    }

    #[test]
    fn test_upfront_only_has_full_payment() {
        let options = payment_options(PaymentTerms::Upfront, 1250, &timeline(5));
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].total(), 1250);
    }

    #[test]
    fn test_split_puts_odd_unit_on_deposit() {
        let options = payment_options(PaymentTerms::Split5050, 2701, &timeline(8));
        let split = &options[1];
        assert_eq!(split.installments[0].amount, 1351);
        assert_eq!(split.installments[1].amount, 1350);
        assert_eq!(split.installments[1].due_day, 8);
        assert_eq!(split.total(), 2701);
    }

    #[test]
    fn test_milestone_installments_follow_milestone_days() {
        let options = payment_options(PaymentTerms::Milestone, 1003, &timeline(40));
        let plan = &options[1];
        let days: Vec<u32> = plan.installments.iter().map(|i| i.due_day).collect();
        assert_eq!(days, vec![10, 20, 30, 40]);
        assert_eq!(plan.installments[3].amount, 253);
        assert_eq!(plan.total(), 1003);
    }

    #[test]
    fn test_monthly_rounds_months_up() {
        let options = payment_options(PaymentTerms::Monthly, 10000, &timeline(45));
        let plan = &options[1];
        assert_eq!(plan.label, "2 monthly payments");
        assert_eq!(plan.installments.len(), 2);
        assert_eq!(plan.installments[1].due_day, 30);
        assert_eq!(plan.total(), 10000);

        let short = payment_options(PaymentTerms::Monthly, 999, &timeline(0));
        assert_eq!(short[1].installments.len(), 1);
        assert_eq!(short[1].total(), 999);
    }
}
