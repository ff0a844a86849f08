//! Client-side filtering, search, pagination and statistics over the user
//! and report collections.
//!
//! All predicates compose with logical AND; a `None` sub-filter means "all"
//! and is bypassed. Filter or search changes reset pagination to the first
//! page; that is the only pagination correction performed.

use crate::i18n::{resolve, Language, TranslationKey};
use crate::reports::{ClosureState, Report, VerificationResult};
use crate::users::{Profile, Role};
use chrono::{Months, NaiveDate};

// ==================== User list ====================

/// Composite filter over the user list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilters {
    /// Case-insensitive substring matched against name OR email.
    pub search: String,
    pub role: Option<Role>,
    pub company: Option<String>,
    /// `Some(true)` = active only, `Some(false)` = inactive only.
    pub active: Option<bool>,
}

impl UserFilters {
    pub fn matches(&self, user: &Profile) -> bool {
        let search = self.search.to_lowercase();
        let matches_search = search.is_empty()
            || user.name.to_lowercase().contains(&search)
            || user
                .email
                .as_deref()
                .map(|e| e.to_lowercase().contains(&search))
                .unwrap_or(false);

        let matches_role = self.role.map(|r| user.role == r).unwrap_or(true);
        let matches_company = self
            .company
            .as_deref()
            .map(|c| user.company == c)
            .unwrap_or(true);
        let matches_status = self.active.map(|a| user.is_active == a).unwrap_or(true);

        matches_search && matches_role && matches_company && matches_status
    }
}

pub fn filter_users<'a>(users: &'a [Profile], filters: &UserFilters) -> Vec<&'a Profile> {
    users.iter().filter(|u| filters.matches(u)).collect()
}

/// Company filter options: "all" first, then the distinct non-empty company
/// values of the unfiltered list in first-seen order.
pub fn company_options(users: &[Profile]) -> Vec<String> {
    let mut options = vec!["all".to_string()];
    for user in users {
        if !user.company.is_empty() && !options[1..].iter().any(|c| c == &user.company) {
            options.push(user.company.clone());
        }
    }
    options
}

/// Fixed-size paginator. Pages are 1-indexed.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    pub page_size: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self { page_size }
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    /// Items of the given page. Out-of-range pages yield an empty slice;
    /// they are not auto-corrected.
    pub fn page_slice<'a, T>(&self, items: &'a [T], page: usize) -> &'a [T] {
        if page == 0 {
            return &[];
        }
        let start = (page - 1) * self.page_size;
        if start >= items.len() {
            return &[];
        }
        let end = (start + self.page_size).min(items.len());
        &items[start..end]
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(10)
    }
}

/// Filter + pagination state for the user list view.
///
/// Every filter or search mutation resets the current page to 1.
#[derive(Debug, Clone)]
pub struct UserFilterState {
    pub filters: UserFilters,
    pub page: usize,
    pub paginator: Paginator,
}

impl UserFilterState {
    pub fn new(page_size: usize) -> Self {
        Self {
            filters: UserFilters::default(),
            page: 1,
            paginator: Paginator::new(page_size),
        }
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filters.search = search.into();
        self.page = 1;
    }

    pub fn set_role(&mut self, role: Option<Role>) {
        self.filters.role = role;
        self.page = 1;
    }

    pub fn set_company(&mut self, company: Option<String>) {
        self.filters.company = company;
        self.page = 1;
    }

    pub fn set_status(&mut self, active: Option<bool>) {
        self.filters.active = active;
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Filtered view plus the visible page of it.
    pub fn view<'a>(&self, users: &'a [Profile]) -> (Vec<&'a Profile>, Vec<&'a Profile>) {
        let filtered = filter_users(users, &self.filters);
        let visible = self.paginator.page_slice(&filtered, self.page).to_vec();
        (filtered, visible)
    }
}

/// Aggregate statistics over the unfiltered user list.
#[derive(Debug, Clone, PartialEq)]
pub struct UserStatistics {
    pub total: usize,
    pub active: usize,
    /// Top 3 roles by frequency as "label: count", comma-joined. Stable
    /// descending order: ties go to the role encountered first.
    pub role_distribution: String,
}

pub fn user_statistics(users: &[Profile], language: Language) -> UserStatistics {
    let mut counts: Vec<(Role, usize)> = Vec::new();
    for user in users {
        match counts.iter_mut().find(|(role, _)| *role == user.role) {
            Some((_, count)) => *count += 1,
            None => counts.push((user.role, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1)); // stable: first-seen wins ties

    let top: Vec<String> = counts
        .iter()
        .take(3)
        .map(|(role, count)| {
            format!(
                "{}: {}",
                resolve(language, TranslationKey::for_role(*role)),
                count
            )
        })
        .collect();

    let role_distribution = if top.is_empty() {
        resolve(language, TranslationKey::NoDataFound).to_string()
    } else {
        top.join(", ")
    };

    UserStatistics {
        total: users.len(),
        active: users.iter().filter(|u| u.is_active).count(),
        role_distribution,
    }
}

// ==================== Reports ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    #[default]
    All,
    Week,
    Month,
    Quarter,
}

impl DateRange {
    /// Earliest verification date still included, relative to `today`.
    pub fn cutoff(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            DateRange::All => None,
            DateRange::Week => Some(today - chrono::Duration::days(7)),
            DateRange::Month => today.checked_sub_months(Months::new(1)),
            DateRange::Quarter => today.checked_sub_months(Months::new(3)),
        }
    }
}

/// Composite filter over the report list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportFilters {
    /// Case-insensitive substring matched against work center OR task.
    pub search: String,
    pub result: Option<VerificationResult>,
    pub status: Option<ClosureState>,
    pub date_range: DateRange,
}

impl ReportFilters {
    pub fn matches(&self, report: &Report, today: NaiveDate) -> bool {
        let search = self.search.to_lowercase();
        let matches_search = search.is_empty()
            || report.work_center.to_lowercase().contains(&search)
            || report.task.to_lowercase().contains(&search);

        let matches_result = self.result.map(|r| report.result == r).unwrap_or(true);
        let matches_status = self.status.map(|s| report.closure == s).unwrap_or(true);

        // Rows whose date failed to parse are excluded from any bounded
        // range rather than crashing the filter.
        let matches_date = match self.date_range.cutoff(today) {
            None => true,
            Some(cutoff) => report
                .verification_date
                .map(|date| date >= cutoff)
                .unwrap_or(false),
        };

        matches_search && matches_result && matches_status && matches_date
    }
}

pub fn filter_reports<'a>(
    reports: &'a [Report],
    filters: &ReportFilters,
    today: NaiveDate,
) -> Vec<&'a Report> {
    reports
        .iter()
        .filter(|r| filters.matches(r, today))
        .collect()
}

/// Aggregate statistics over the filtered report list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportStatistics {
    pub total: usize,
    pub acceptable: usize,
    pub not_acceptable: usize,
    pub closed: usize,
    pub pending: usize,
    /// round(100 · acceptable / total); 0 when total is 0.
    pub acceptable_percentage: u32,
    /// Always the complement of `acceptable_percentage`.
    pub not_acceptable_percentage: u32,
    pub closed_percentage: u32,
}

pub fn report_statistics<R: AsRef<Report>>(reports: &[R]) -> ReportStatistics {
    let total = reports.len();
    let acceptable = reports
        .iter()
        .filter(|r| r.as_ref().result == VerificationResult::Acceptable)
        .count();
    let closed = reports
        .iter()
        .filter(|r| r.as_ref().closure == ClosureState::Closed)
        .count();

    let acceptable_percentage = percentage(acceptable, total);

    ReportStatistics {
        total,
        acceptable,
        not_acceptable: total - acceptable,
        closed,
        pending: total - closed,
        acceptable_percentage,
        not_acceptable_percentage: 100 - acceptable_percentage,
        closed_percentage: percentage(closed, total),
    }
}

fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        0
    } else {
        ((part as f64 / total as f64) * 100.0).round() as u32
    }
}
