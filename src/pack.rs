use crate::models::{PackGapResult, ResultRecord};
use crate::scoring::{cmp_place, team_finishers};

const PACK_FIVE: usize = 5;
const PACK_SEVEN: usize = 7;

/// Population standard deviation; zero for an empty slice.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let variance = values
        .iter()
        .map(|value| (value - mean) * (value - mean))
        .sum::<f64>()
        / count;
    variance.sqrt()
}

fn spread(times: &[f64], depth: usize) -> Option<f64> {
    if times.len() < depth {
        return None;
    }
    Some(times[depth - 1] - times[0])
}

/// Pack cohesion for a team at a meet, ordered by time rather than place.
pub fn compute_pack_gaps(
    records: &[ResultRecord],
    meet_id: &str,
    team_name: &str,
) -> PackGapResult {
    let mut timed: Vec<(f64, &ResultRecord)> = team_finishers(records, meet_id, team_name)
        .into_iter()
        .filter_map(|record| record.finish_time().map(|time| (time, record)))
        .collect();

    timed.sort_by(|(a_time, a), (b_time, b)| {
        a_time
            .total_cmp(b_time)
            .then_with(|| cmp_place(a.place, b.place))
            .then_with(|| a.athlete.cmp(&b.athlete))
    });

    let times: Vec<f64> = timed.iter().map(|(time, _)| *time).collect();

    PackGapResult {
        gap_1_to_5_seconds: spread(&times, PACK_FIVE),
        gap_1_to_7_seconds: spread(&times, PACK_SEVEN),
        top5_std_dev_seconds: (times.len() >= PACK_FIVE)
            .then(|| population_std_dev(&times[..PACK_FIVE])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{finisher, season};

    fn close(actual: Option<f64>, expected: f64, tolerance: f64) -> bool {
        actual.is_some_and(|value| (value - expected).abs() < tolerance)
    }

    #[test]
    fn calculates_pack_gaps_and_dispersion() {
        let records = season();
        let result = compute_pack_gaps(&records, "Invite A", "XC Hawks");

        assert!(close(result.gap_1_to_5_seconds, 40.0, 1e-9));
        assert!(close(result.gap_1_to_7_seconds, 60.0, 1e-9));
        assert!(close(result.top5_std_dev_seconds, 14.142, 1e-3));
    }

    #[test]
    fn fewer_than_five_runners_leave_every_metric_empty() {
        let records = season();
        let result = compute_pack_gaps(&records, "Invite C", "hawks");
        assert_eq!(result, PackGapResult::default());
    }

    #[test]
    fn seven_gap_needs_seven_times() {
        let records = season();
        let result = compute_pack_gaps(&records, "Invite B", "Speedsters");
        assert!(close(result.gap_1_to_5_seconds, 40.0, 1e-9));
        assert_eq!(result.gap_1_to_7_seconds, None);
    }

    #[test]
    fn orders_by_time_not_place() {
        // Place order disagrees with time order; the pack is measured on times.
        let records = vec![
            finisher("Mud", "", "Joggers", "A", 1, 420.0),
            finisher("Mud", "", "Joggers", "B", 2, 400.0),
            finisher("Mud", "", "Joggers", "C", 3, 405.0),
            finisher("Mud", "", "Joggers", "D", 4, 410.0),
            finisher("Mud", "", "Joggers", "E", 5, 415.0),
            finisher("Mud", "", "Joggers", "F", 6, 500.0),
        ];
        let result = compute_pack_gaps(&records, "Mud", "Joggers");
        assert!(close(result.gap_1_to_5_seconds, 20.0, 1e-9));
    }

    #[test]
    fn untimed_finishers_are_skipped() {
        let mut records = season();
        records
            .iter_mut()
            .filter(|record| record.meet == "Invite B" && record.athlete == "Lena Fox")
            .for_each(|record| record.time_seconds = None);
        let result = compute_pack_gaps(&records, "Invite B", "Speedsters");
        assert_eq!(result.gap_1_to_5_seconds, None);
        assert_eq!(result.top5_std_dev_seconds, None);
    }

    #[test]
    fn std_dev_is_population_based() {
        assert_eq!(population_std_dev(&[]), 0.0);
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((population_std_dev(&values) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let records = season();
        assert_eq!(
            compute_pack_gaps(&records, "Invite A", "XC Hawks"),
            compute_pack_gaps(&records, "Invite A", "XC Hawks")
        );
    }
}
