//! Order statistics aggregation
//!
//! Validation order is fixed: `group_by`, then `page`, then `limit`. An
//! unknown granularity is rejected whatever the paging arguments are.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use shared::error::{AppError, ErrorCode};
use shared::models::{DateRange, GroupBy, OrderStats, end_of_day, total_pages};

use crate::db::OrderStore;
use crate::error::ServiceResult;

/// Build one page of grouped order counts.
pub async fn get_order_stats(
    store: &dyn OrderStore,
    page: i64,
    limit: i64,
    group_by: &str,
    range: DateRange,
) -> ServiceResult<OrderStats> {
    let group_by: GroupBy = group_by
        .parse()
        .map_err(|e: shared::models::InvalidGroupBy| {
            AppError::with_message(
                ErrorCode::InvalidGroupBy,
                "Invalid groupBy parameter. Use: day, month, year",
            )
            .with_detail("group_by", e.0)
        })?;
    if page < 1 {
        return Err(AppError::new(ErrorCode::InvalidPage)
            .with_detail("page", page)
            .into());
    }
    if limit < 1 {
        return Err(AppError::new(ErrorCode::InvalidLimit)
            .with_detail("limit", limit)
            .into());
    }

    let offset = (page - 1).saturating_mul(limit);

    let total_items = store.count_orders(&range).await?;
    let distinct_periods = store.count_periods(group_by, &range).await?;
    let rows = store
        .period_counts(group_by, &range, offset, limit)
        .await?;

    if rows.is_empty() {
        return Err(AppError::new(ErrorCode::NoMoreItems)
            .with_detail("page", page)
            .into());
    }

    let data = rows
        .iter()
        .map(|row| group_by.bucket(&row.period, row.order_count))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::internal(e.to_string()))?;

    Ok(OrderStats {
        page,
        limit,
        total_pages: total_pages(distinct_periods, limit),
        total_items,
        group_by,
        data,
    })
}

/// Parse a `start_date`/`end_date` bound.
///
/// Accepts `YYYY-MM-DD` or a full timestamp (space or `T` separator). A
/// date-only upper bound is widened to the end of that day.
pub fn parse_date_bound(value: &str, is_end: bool) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(if is_end {
            end_of_day(date)
        } else {
            date.and_time(NaiveTime::MIN)
        });
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryOrderStore;
    use crate::error::ServiceError;
    use shared::models::StatsBucket;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn store() -> MemoryOrderStore {
        MemoryOrderStore::with_create_dates([
            ts("2025-01-02 10:00:00"),
            ts("2025-01-15 12:30:00"),
            ts("2025-02-01 08:00:00"),
        ])
    }

    fn code_of(err: ServiceError) -> ErrorCode {
        match err {
            ServiceError::App(e) => e.code,
            ServiceError::Db(e) => panic!("unexpected store error: {e}"),
        }
    }

    #[tokio::test]
    async fn test_month_grouping() {
        let stats = get_order_stats(&store(), 1, 10, "month", DateRange::default())
            .await
            .unwrap();
        assert_eq!(stats.total_items, 3);
        assert_eq!(stats.total_pages, 1);
        assert_eq!(
            stats.data,
            vec![
                StatsBucket::Month {
                    year: 2025,
                    month: 2,
                    count: 1
                },
                StatsBucket::Month {
                    year: 2025,
                    month: 1,
                    count: 2
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_day_grouping_one_per_page() {
        let stats = get_order_stats(&store(), 1, 1, "day", DateRange::default())
            .await
            .unwrap();
        assert_eq!(stats.total_pages, 3);
        assert_eq!(
            stats.data,
            vec![StatsBucket::Day {
                period: "2025-02-01".into(),
                count: 1
            }]
        );
    }

    #[tokio::test]
    async fn test_largest_limit_is_one_page() {
        let stats = get_order_stats(&store(), 1, i64::MAX, "month", DateRange::default())
            .await
            .unwrap();
        assert_eq!(stats.total_pages, 1);
        assert_eq!(stats.data.len(), 2);

        let err = get_order_stats(&store(), 2, i64::MAX, "month", DateRange::default())
            .await
            .unwrap_err();
        assert_eq!(code_of(err), ErrorCode::NoMoreItems);
    }

    #[tokio::test]
    async fn test_page_overrun() {
        let err = get_order_stats(&store(), 99, 10, "month", DateRange::default())
            .await
            .unwrap_err();
        assert_eq!(code_of(err), ErrorCode::NoMoreItems);
    }

    #[tokio::test]
    async fn test_empty_store_is_overrun() {
        let err = get_order_stats(&MemoryOrderStore::new(), 1, 10, "year", DateRange::default())
            .await
            .unwrap_err();
        assert_eq!(code_of(err), ErrorCode::NoMoreItems);
    }

    #[tokio::test]
    async fn test_group_by_checked_before_paging() {
        let err = get_order_stats(&store(), 0, 0, "week", DateRange::default())
            .await
            .unwrap_err();
        assert_eq!(code_of(err), ErrorCode::InvalidGroupBy);

        let err = get_order_stats(&store(), 0, 0, "day", DateRange::default())
            .await
            .unwrap_err();
        assert_eq!(code_of(err), ErrorCode::InvalidPage);

        let err = get_order_stats(&store(), 1, 0, "day", DateRange::default())
            .await
            .unwrap_err();
        assert_eq!(code_of(err), ErrorCode::InvalidLimit);
    }

    #[tokio::test]
    async fn test_date_filter_counts_items() {
        let range = DateRange::new(
            parse_date_bound("2025-01-15", false),
            parse_date_bound("2025-01-15", true),
        );
        let stats = get_order_stats(&store(), 1, 10, "year", range)
            .await
            .unwrap();
        assert_eq!(stats.total_items, 1);
        assert_eq!(stats.data, vec![StatsBucket::Year { year: 2025, count: 1 }]);
    }

    #[tokio::test]
    async fn test_total_pages_matches_distinct_periods() {
        let store = store();
        for group_by in GroupBy::ALL {
            let distinct = store
                .count_periods(group_by, &DateRange::default())
                .await
                .unwrap();
            for limit in 1..=4 {
                let stats =
                    get_order_stats(&store, 1, limit, group_by.as_str(), DateRange::default())
                        .await
                        .unwrap();
                assert_eq!(stats.total_pages, (distinct + limit - 1) / limit);
                assert_eq!(stats.total_items, 3);
            }
        }
    }

    #[tokio::test]
    async fn test_grouping_is_repeatable() {
        let store = store();
        let a = get_order_stats(&store, 1, 2, "day", DateRange::default())
            .await
            .unwrap();
        let b = get_order_stats(&store, 1, 2, "day", DateRange::default())
            .await
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_date_bound() {
        assert_eq!(
            parse_date_bound("2025-01-15", false),
            Some(ts("2025-01-15 00:00:00"))
        );
        let end = parse_date_bound("2025-01-15", true).unwrap();
        assert!(end > ts("2025-01-15 23:59:59"));
        assert_eq!(
            parse_date_bound("2025-01-15T08:30:00", true),
            Some(ts("2025-01-15 08:30:00"))
        );
        assert_eq!(
            parse_date_bound("2025-01-15 08:30:00", false),
            Some(ts("2025-01-15 08:30:00"))
        );
        assert!(parse_date_bound("15/01/2025", false).is_none());
    }
}
