/// Page size used when the caller does not ask for a valid one.
pub const DEFAULT_PAGE_SIZE: u64 = 2;

/// Concrete offset/limit window for one page of a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPlan {
    /// Number of rows per page.
    pub page_size: u64,
    /// Number of rows to skip before the page starts.
    pub skip: u64,
    /// Total number of pages, never less than one.
    pub page_count: u64,
    /// Effective one-based page after clamping.
    pub current_page: u64,
}

/// Turns the raw `currentPage` / `limitItems` query values into a [`PaginationPlan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    default_page_size: u64,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    /// Creates a paginator. A zero default is bumped to one.
    pub fn new(default_page_size: u64) -> Self {
        Self {
            default_page_size: default_page_size.max(1),
        }
    }

    pub fn default_page_size(&self) -> u64 {
        self.default_page_size
    }

    /// Plans the page window for `total` matching rows.
    ///
    /// Missing, non-numeric or non-positive inputs fall back to page 1 and the
    /// default page size. The page is clamped to `[1, page_count]`, so asking
    /// for a page past the end yields the last page.
    pub fn plan(
        &self,
        current_page: Option<&str>,
        limit_items: Option<&str>,
        total: u64,
    ) -> PaginationPlan {
        let page_size = parse_positive(limit_items).unwrap_or(self.default_page_size);
        let page_count = total.div_ceil(page_size).max(1);
        let current_page = parse_positive(current_page)
            .unwrap_or(1)
            .clamp(1, page_count);

        PaginationPlan {
            page_size,
            skip: (current_page - 1) * page_size,
            page_count,
            current_page,
        }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|value| *value > 0)
        .map(|value| value as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_plan_third_page_of_five() {
        let plan = Paginator::default().plan(Some("3"), Some("2"), 5);

        assert_eq!(
            plan,
            PaginationPlan {
                page_size: 2,
                skip: 4,
                page_count: 3,
                current_page: 3,
            }
        );
    }

    #[test]
    fn can_fall_back_to_defaults_when_params_missing() {
        let plan = Paginator::default().plan(None, None, 7);

        assert_eq!(plan.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(plan.current_page, 1);
        assert_eq!(plan.skip, 0);
        assert_eq!(plan.page_count, 4);
    }

    #[test]
    fn can_fall_back_to_defaults_when_params_invalid() {
        let paginator = Paginator::new(5);

        for (page, limit) in [
            ("abc", "xyz"),
            ("0", "0"),
            ("-3", "-10"),
            ("", ""),
            ("1.5", "2.5"),
        ] {
            let plan = paginator.plan(Some(page), Some(limit), 12);
            assert_eq!(plan.page_size, 5, "limit {limit:?}");
            assert_eq!(plan.current_page, 1, "page {page:?}");
        }
    }

    #[test]
    fn can_clamp_page_past_the_end() {
        let plan = Paginator::default().plan(Some("99"), Some("4"), 10);

        assert_eq!(plan.page_count, 3);
        assert_eq!(plan.current_page, 3);
        assert_eq!(plan.skip, 8);
    }

    #[test]
    fn can_plan_single_empty_page_when_nothing_matches() {
        let plan = Paginator::default().plan(Some("4"), Some("10"), 0);

        assert_eq!(plan.page_count, 1);
        assert_eq!(plan.current_page, 1);
        assert_eq!(plan.skip, 0);
    }

    #[test]
    fn zero_default_page_size_is_bumped_to_one() {
        let paginator = Paginator::new(0);

        assert_eq!(paginator.default_page_size(), 1);
        assert_eq!(paginator.plan(None, None, 3).page_count, 3);
    }

    #[test]
    fn skip_stays_within_total_for_all_inputs() {
        let paginator = Paginator::default();

        for total in 0..40u64 {
            for size in 1..9u64 {
                for page in -2..15i64 {
                    let plan =
                        paginator.plan(Some(&page.to_string()), Some(&size.to_string()), total);
                    assert!(plan.skip <= total, "total={total} size={size} page={page}");
                    assert_eq!(plan.page_count, total.div_ceil(size).max(1));
                    assert!((1..=plan.page_count).contains(&plan.current_page));
                    assert_eq!(plan.skip, (plan.current_page - 1) * plan.page_size);
                }
            }
        }
    }
}
