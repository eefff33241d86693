use crate::types::export::{ExportDocument, MetricSeries, WorkoutEntry};
use crate::types::record::{FlatRecord, RecordType};

/// One record per step sample. Location and elevation are copied onto every
/// sample of their workout; a workout without step samples yields nothing.
pub fn flatten_workouts(document: &ExportDocument, user_id: &str) -> Vec<FlatRecord> {
    document
        .data
        .workouts
        .iter()
        .flat_map(|workout| workout_records(workout, user_id))
        .collect()
}

/// One record per metric sample, carrying the series name and units.
pub fn flatten_metrics(document: &ExportDocument, user_id: &str) -> Vec<FlatRecord> {
    document
        .data
        .metrics
        .iter()
        .flat_map(|series| metric_records(series, user_id))
        .collect()
}

fn workout_records<'a>(
    workout: &'a WorkoutEntry,
    user_id: &'a str,
) -> impl Iterator<Item = FlatRecord> + 'a {
    let elevation = workout.elevation_up.as_ref();

    workout.step_count.iter().flatten().map(move |step| FlatRecord {
        health_data_user: user_id.to_string(),
        record_type: RecordType::Workout,
        date: step.date.clone(),
        source: step.source.clone(),
        workout_qty: step.qty.clone(),
        workout_units: step.units.clone(),
        elevation_qty: elevation.and_then(|e| e.qty.clone()),
        elevation_units: elevation.and_then(|e| e.units.clone()),
        location: workout.location.clone(),
        value: None,
        units: None,
        metric_name: None,
    })
}

fn metric_records<'a>(
    series: &'a MetricSeries,
    user_id: &'a str,
) -> impl Iterator<Item = FlatRecord> + 'a {
    series.data.iter().flatten().map(move |sample| FlatRecord {
        health_data_user: user_id.to_string(),
        record_type: RecordType::Metric,
        date: sample.date.clone(),
        source: sample.source.clone(),
        workout_qty: None,
        workout_units: None,
        elevation_qty: None,
        elevation_units: None,
        location: None,
        value: sample.qty.clone(),
        units: series.units.clone(),
        metric_name: series.name.clone(),
    })
}
