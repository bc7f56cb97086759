use crate::models::Record;

/// Annotate each record with `rate - next_older.rate`.
///
/// The oldest record has no successor and keeps `change == None`.
pub fn annotate_changes(series: &mut [Record]) {
    for i in 1..series.len() {
        let older_rate = series[i].rate;
        let newer = &mut series[i - 1];
        if newer.change.is_none() {
            newer.change = Some(newer.rate - older_rate);
        }
    }
}

/// Drop records that never received a change value, keeping order
pub fn retain_complete(series: Vec<Record>) -> Vec<Record> {
    series.into_iter().filter(Record::is_complete).collect()
}
