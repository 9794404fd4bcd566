use crate::domain::model::{Milestone, ScheduledService, Service, Timeline};
use crate::utils::error::{PackagerError, Result};
use chrono::{Days, NaiveDate};
use std::collections::{HashMap, HashSet};

pub const MILESTONE_PERCENTAGES: [u32; 4] = [25, 50, 75, 100];

/// 依相依關係排序（後序 DFS，相依的服務在前）
///
/// 只考慮清單內的服務之間的相依；清單外的相依視為已完成。
/// 遞迴中再次遇到尚未完成拜訪的節點即為循環，回傳完整的循環路徑。
pub fn dependency_order<'a>(services: &[&'a Service]) -> Result<Vec<&'a Service>> {
    let index: HashMap<&'a str, &'a Service> =
        services.iter().copied().map(|s| (s.id.as_str(), s)).collect();

    let mut visited: HashSet<&'a str> = HashSet::new();
    let mut stack: Vec<&'a str> = Vec::new();
    let mut ordered = Vec::with_capacity(services.len());

    for &service in services {
        visit(service, &index, &mut visited, &mut stack, &mut ordered)?;
    }

    Ok(ordered)
}

fn visit<'a>(
    service: &'a Service,
    index: &HashMap<&'a str, &'a Service>,
    visited: &mut HashSet<&'a str>,
    stack: &mut Vec<&'a str>,
    ordered: &mut Vec<&'a Service>,
) -> Result<()> {
    if visited.contains(service.id.as_str()) {
        return Ok(());
    }

    if let Some(pos) = stack.iter().position(|id| *id == service.id) {
        let mut cycle: Vec<String> = stack[pos..].iter().map(|id| id.to_string()).collect();
        cycle.push(service.id.clone());
        return Err(PackagerError::CyclicDependency { cycle });
    }

    stack.push(service.id.as_str());
    for dep in &service.dependencies {
        if let Some(&dep_service) = index.get(dep.as_str()) {
            visit(dep_service, index, visited, stack, ordered)?;
        }
    }
    stack.pop();

    visited.insert(service.id.as_str());
    ordered.push(service);
    Ok(())
}

/// 產生循序的交付時程
pub fn build_timeline(services: &[&Service], start_date: Option<NaiveDate>) -> Result<Timeline> {
    if services.is_empty() {
        return Err(PackagerError::invalid_input(
            "cannot schedule an empty service list",
        ));
    }

    let ordered = dependency_order(services)?;
    let chosen: HashSet<&str> = services.iter().map(|s| s.id.as_str()).collect();
    let mut completed: HashSet<&str> = HashSet::new();
    let mut current_day = 0u32;
    let mut schedule = Vec::with_capacity(ordered.len());

    for service in ordered {
        debug_assert!(service
            .dependencies
            .iter()
            .filter(|d| chosen.contains(d.as_str()))
            .all(|d| completed.contains(d.as_str())));

        let start_day = current_day;
        let end_day = start_day.checked_add(service.duration_days).ok_or_else(|| {
            PackagerError::invalid_input(format!(
                "schedule overflows at service '{}' (day {} + {} days)",
                service.id, start_day, service.duration_days
            ))
        })?;
        completed.insert(service.id.as_str());
        current_day = current_day.max(end_day);

        tracing::debug!(
            "Scheduled '{}' on days {}..{}",
            service.id,
            start_day,
            end_day
        );

        schedule.push(ScheduledService {
            service_id: service.id.clone(),
            name: service.name.clone(),
            start_day,
            end_day,
            start_date: offset_date(start_date, start_day),
            end_date: offset_date(start_date, end_day),
        });
    }

    let total_duration = schedule.iter().map(|s| s.end_day).max().unwrap_or(0);
    let critical_path = critical_path(&schedule);
    let milestones = milestones(&schedule, total_duration, start_date);

    Ok(Timeline {
        total_duration,
        schedule,
        critical_path,
        milestones,
        start_date,
        end_date: offset_date(start_date, total_duration),
    })
}

/// 結束日最晚的前半數服務（無條件進位），並非真正的要徑分析
pub fn critical_path(schedule: &[ScheduledService]) -> Vec<String> {
    let mut by_end: Vec<&ScheduledService> = schedule.iter().collect();
    by_end.sort_by(|a, b| b.end_day.cmp(&a.end_day));
    by_end
        .into_iter()
        .take(schedule.len().div_ceil(2))
        .map(|s| s.service_id.clone())
        .collect()
}

pub fn milestones(
    schedule: &[ScheduledService],
    total_duration: u32,
    start_date: Option<NaiveDate>,
) -> Vec<Milestone> {
    MILESTONE_PERCENTAGES
        .iter()
        .map(|&percentage| {
            let day = (total_duration as f64 * percentage as f64 / 100.0).round() as u32;
            Milestone {
                percentage,
                day,
                date: offset_date(start_date, day),
                completed: schedule
                    .iter()
                    .filter(|s| s.end_day <= day)
                    .map(|s| s.service_id.clone())
                    .collect(),
            }
        })
        .collect()
}

fn offset_date(start: Option<NaiveDate>, days: u32) -> Option<NaiveDate> {
    start.and_then(|d| d.checked_add_days(Days::new(u64::from(days))))
}
