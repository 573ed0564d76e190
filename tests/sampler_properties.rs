use cpu_process_profiler::error::MeasurementError;
use cpu_process_profiler::system::cpu::{CpuSnapshot, compute_utilization};
use cpu_process_profiler::system::process::{ProcessSample, rank_top};
use proptest::prelude::*;

fn snapshot(values: &[f64; 10]) -> CpuSnapshot {
    CpuSnapshot {
        user: values[0],
        system: values[1],
        idle: values[2],
        nice: values[3],
        iowait: values[4],
        irq: values[5],
        softirq: values[6],
        steal: values[7],
        guest: values[8],
        guest_nice: values[9],
    }
}

fn advance(start: &[f64; 10], deltas: &[f64; 10]) -> [f64; 10] {
    let mut end = *start;
    for (value, delta) in end.iter_mut().zip(deltas) {
        *value += delta;
    }
    end
}

// Counters tick in 1/64 s steps so snapshot totals are exact in f64.
fn ticks(raw: [u32; 10]) -> [f64; 10] {
    raw.map(|t| t as f64 / 64.0)
}

fn counters() -> impl Strategy<Value = [f64; 10]> {
    prop::array::uniform10(0u32..100_000_000).prop_map(ticks)
}

fn deltas() -> impl Strategy<Value = [f64; 10]> {
    prop::array::uniform10(0u32..1_000_000)
        .prop_filter("window must advance", |d| d.iter().any(|&t| t > 0))
        .prop_map(ticks)
}

proptest! {
    #[test]
    fn percentages_sum_to_one_hundred(start in counters(), deltas in deltas()) {
        let end = advance(&start, &deltas);
        let util = compute_utilization(&snapshot(&start), &snapshot(&end)).unwrap();
        prop_assert!(
            (util.category_sum() - 100.0).abs() < 1e-9,
            "sum was {}", util.category_sum()
        );
    }

    #[test]
    fn used_is_complement_of_idle(start in counters(), deltas in deltas()) {
        let end = advance(&start, &deltas);
        let util = compute_utilization(&snapshot(&start), &snapshot(&end)).unwrap();
        prop_assert!((util.used + util.idle - 100.0).abs() < 1e-9);
        for (key, pct) in util.categories() {
            prop_assert!(pct >= 0.0, "{} was negative: {}", key, pct);
            prop_assert!(pct <= 100.0 + 1e-6, "{} above 100: {}", key, pct);
        }
    }

    #[test]
    fn no_elapsed_time_is_an_error(start in counters()) {
        let snap = snapshot(&start);
        let result = compute_utilization(&snap, &snap);
        prop_assert!(matches!(result, Err(MeasurementError::NoElapsedTime(_))));
    }

    #[test]
    fn reversed_snapshots_are_an_error(start in counters(), deltas in deltas()) {
        let end = advance(&start, &deltas);
        let result = compute_utilization(&snapshot(&end), &snapshot(&start));
        prop_assert!(result.is_err());
    }

    #[test]
    fn ranking_is_a_stable_truncated_sort(
        cpus in prop::collection::vec(0u8..20, 0..40),
        limit in 1usize..15,
    ) {
        let samples: Vec<ProcessSample> = cpus
            .iter()
            .enumerate()
            .map(|(i, &cpu)| ProcessSample::new(i as u32, cpu as f32, format!("p{i}")))
            .collect();

        let ranked = rank_top(samples.clone(), limit);
        prop_assert_eq!(ranked.len(), samples.len().min(limit));

        let mut expected = samples;
        expected.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent));
        expected.truncate(limit);
        prop_assert_eq!(ranked.as_slice(), expected.as_slice());

        for pair in ranked.as_slice().windows(2) {
            prop_assert!(pair[0].cpu_percent >= pair[1].cpu_percent);
            if pair[0].cpu_percent == pair[1].cpu_percent {
                prop_assert!(pair[0].pid < pair[1].pid);
            }
        }
    }
}
