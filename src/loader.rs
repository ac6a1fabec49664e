use std::path::Path;

use anyhow::Context;

use crate::models::ResultRecord;

/// Reads already-normalized result records from a JSON array or a CSV file.
pub fn load_records(path: &Path) -> anyhow::Result<Vec<ResultRecord>> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let records = if is_json {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str::<Vec<ResultRecord>>(&contents)
            .with_context(|| format!("invalid result records in {}", path.display()))?
    } else {
        read_csv(path)?
    };

    let stray_times = records
        .iter()
        .filter(|record| record.time_seconds.is_some() && record.finish_time().is_none())
        .count();
    if stray_times > 0 {
        tracing::warn!(
            path = %path.display(),
            stray_times,
            "ignoring times on rows that did not finish or are not finite"
        );
    }

    tracing::info!(path = %path.display(), records = records.len(), "loaded result records");
    Ok(records)
}

fn read_csv(path: &Path) -> anyhow::Result<Vec<ResultRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut records = Vec::new();
    for (index, result) in reader.deserialize::<ResultRecord>().enumerate() {
        let record = result.with_context(|| {
            format!("invalid result record on row {} of {}", index + 2, path.display())
        })?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResultStatus;
    use std::io::Write;

    fn temp_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn reads_normalized_csv_with_empty_cells() {
        let file = temp_file(
            ".csv",
            "meet,date,division,team,athlete,gender,grade,place,time_seconds,status\n\
             Invite A,2024-09-01,Varsity,XC Hawks,Alice Hart,F,12,1,360.0,FINISHED\n\
             Invite A,2024-09-01,Varsity,XC Hawks,Rita Zhang,F,,,,DNF\n",
        );

        let records = load_records(file.path()).expect("csv loads");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].place, Some(1));
        assert_eq!(records[0].time_seconds, Some(360.0));
        assert_eq!(records[1].status, ResultStatus::Dnf);
        assert_eq!(records[1].grade, None);
        assert_eq!(records[1].place, None);
        assert_eq!(records[1].time_seconds, None);
    }

    #[test]
    fn reads_json_arrays() {
        let file = temp_file(
            ".json",
            r#"[{"meet":"Invite B","date":"2024-09-15","division":"Varsity","team":"Speedsters",
                "athlete":"Lena Fox","gender":"F","grade":null,"place":17,"time_seconds":385.0,
                "status":"FINISHED"}]"#,
        );

        let records = load_records(file.path()).expect("json loads");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].athlete, "Lena Fox");
        assert_eq!(records[0].status, ResultStatus::Finished);
    }

    #[test]
    fn reports_bad_rows_with_context() {
        let file = temp_file(
            ".csv",
            "meet,date,division,team,athlete,gender,grade,place,time_seconds,status\n\
             Invite A,2024-09-01,Varsity,XC Hawks,Alice Hart,F,12,first,360.0,FINISHED\n",
        );

        let error = load_records(file.path()).expect_err("bad place");
        assert!(format!("{error:#}").contains("row 2"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_records(Path::new("/definitely/not/here.csv")).is_err());
    }
}
