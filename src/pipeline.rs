//! End-to-end table transformations.
//!
//! Each function validates its whole input before transforming anything, so
//! a caller receives either the complete output table or the first error.

use tracing::{info, instrument};

use crate::config::TollConfig;
use crate::distance::{unroll_distance_matrix, DistanceMatrix};
use crate::error::TollError;
use crate::models::{ingest_edges, EdgeRecord, ScheduleRecord, ScheduledTollRow, TollRow};

/// Raw edges → cumulative matrix → unrolled edges → toll rows.
///
/// # Examples
///
/// ```
/// use u_toll::config::TollConfig;
/// use u_toll::models::EdgeRecord;
/// use u_toll::pipeline::toll_table;
///
/// let records = vec![EdgeRecord::new(1, 2, 10.0), EdgeRecord::new(2, 1, 5.0)];
/// let rows = toll_table(&records, &TollConfig::default()).unwrap();
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[0].edge.distance(), 15.0);
/// assert!((rows[1].rates.car - 18.0).abs() < 1e-10);
/// ```
#[instrument(level = "info", skip_all, fields(records = records.len()))]
pub fn toll_table(records: &[EdgeRecord], config: &TollConfig) -> Result<Vec<TollRow>, TollError> {
    config.validate()?;
    let edges = ingest_edges(records)?;
    let matrix = DistanceMatrix::from_edges(&edges);
    let unrolled = unroll_distance_matrix(&matrix);
    let rows = config.rate_engine().price_all(&unrolled);
    info!(locations = matrix.size(), rows = rows.len(), "toll table ready");
    Ok(rows)
}

/// Raw time-windowed records → toll rows → discounted toll rows.
///
/// # Examples
///
/// ```
/// use u_toll::config::TollConfig;
/// use u_toll::models::ScheduleRecord;
/// use u_toll::pipeline::time_based_toll_rates;
///
/// let records = vec![
///     ScheduleRecord::new(1, 2, 10.0, ("Monday", "11:00:00"), ("Monday", "12:00:00")),
///     ScheduleRecord::new(1, 2, 10.0, ("Sunday", "11:00:00"), ("Sunday", "12:00:00")),
/// ];
/// let rows = time_based_toll_rates(&records, &TollConfig::default()).unwrap();
/// assert!((rows[0].toll.rates.car - 14.4).abs() < 1e-10);
/// assert!((rows[1].toll.rates.car - 8.4).abs() < 1e-10);
/// ```
#[instrument(level = "info", skip_all, fields(records = records.len()))]
pub fn time_based_toll_rates(
    records: &[ScheduleRecord],
    config: &TollConfig,
) -> Result<Vec<ScheduledTollRow>, TollError> {
    config.validate()?;
    let scheduler = config.scheduler()?;
    let engine = config.rate_engine();
    let mut rows = records
        .iter()
        .enumerate()
        .map(|(row, record)| -> Result<ScheduledTollRow, TollError> {
            let (edge, window) = record.validate(row)?;
            Ok(ScheduledTollRow::new(engine.price(edge), window))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let discounted = scheduler.apply(&mut rows);
    info!(rows = rows.len(), discounted, "time-based toll rates ready");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VehicleClass;
    use crate::test_support::init_test_logging;

    #[test]
    fn test_toll_table_full_flow() {
        init_test_logging();
        let records = vec![
            EdgeRecord::new(1001400, 1001402, 9.7),
            EdgeRecord::new(1001402, 1001404, 20.2),
            EdgeRecord::new(1001402, 1001400, 0.3),
        ];
        let rows = toll_table(&records, &TollConfig::default()).expect("valid");
        assert_eq!(rows.len(), 6);
        let first = &rows[0];
        assert_eq!(first.edge.id_start(), 1001400);
        assert_eq!(first.edge.id_end(), 1001402);
        assert!((first.edge.distance() - 10.0).abs() < 1e-10);
        assert!((first.rates.truck - 36.0).abs() < 1e-10);
        // 1001400 and 1001404 never share an edge
        assert_eq!(rows[1].edge.distance(), 0.0);
    }

    #[test]
    fn test_toll_table_rejects_bad_row() {
        init_test_logging();
        let records = vec![EdgeRecord::new(1, 2, 1.0), EdgeRecord::default()];
        match toll_table(&records, &TollConfig::default()) {
            Err(TollError::MalformedRow { row, .. }) => assert_eq!(row, 1),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_time_based_rates_with_custom_config() {
        init_test_logging();
        let config = TollConfig::default().with_multiplier(VehicleClass::Car, 1.0);
        let records = vec![
            ScheduleRecord::new(1, 2, 10.0, ("Tuesday", "08:00:00"), ("Tuesday", "09:00:00")),
            ScheduleRecord::new(2, 3, 10.0, ("Saturday", "20:00:00"), ("Sunday", "02:00:00")),
        ];
        let rows = time_based_toll_rates(&records, &config).expect("valid");
        assert!((rows[0].toll.rates.car - 8.0).abs() < 1e-10);
        assert!((rows[1].toll.rates.car - 7.0).abs() < 1e-10);
        assert!((rows[1].toll.rates.rv - 15.0).abs() < 1e-10);
    }

    #[test]
    fn test_time_based_rates_atomic_failure() {
        init_test_logging();
        let records = vec![
            ScheduleRecord::new(1, 2, 10.0, ("Tuesday", "08:00:00"), ("Tuesday", "09:00:00")),
            ScheduleRecord::new(2, 3, 10.0, ("Someday", "20:00:00"), ("Sunday", "02:00:00")),
        ];
        let err = time_based_toll_rates(&records, &TollConfig::default()).unwrap_err();
        assert!(matches!(err, TollError::MalformedRow { row: 1, .. }));
    }
}
