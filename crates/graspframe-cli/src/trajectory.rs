//! Recorded trajectory files.
//!
//! One [`TrajectoryRecord`] per line, `t,x,y,z,Rx,Ry,Rz,f1,f2,f3,f4`, poses in
//! the object frame.  Blank lines and lines starting with `#` are skipped.

use std::fs;
use std::path::Path;

use graspframe_types::{GraspError, TrajectoryRecord};
use tracing::debug;

/// Read and parse every record in `path`.
pub fn read_records(path: &Path) -> Result<Vec<TrajectoryRecord>, GraspError> {
    let text = fs::read_to_string(path)
        .map_err(|e| GraspError::Io(format!("failed to read {}: {e}", path.display())))?;
    let records = parse_records(&text)?;
    debug!(path = %path.display(), records = records.len(), "trajectory loaded");
    Ok(records)
}

/// Parse trajectory text.  Errors carry the 1-based line number.
pub fn parse_records(text: &str) -> Result<Vec<TrajectoryRecord>, GraspError> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(n, line)| line.parse::<TrajectoryRecord>().map_err(|e| e.at_line(n)))
        .collect()
}

/// First and last record: the approach point and the end point of the motion.
///
/// A single-record trajectory returns that record twice.
pub fn endpoints(records: &[TrajectoryRecord]) -> Option<(&TrajectoryRecord, &TrajectoryRecord)> {
    Some((records.first()?, records.last()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
# t,x,y,z,Rx,Ry,Rz,f1,f2,f3,f4
3.158590,0.909219,-53.432566,194.968568,-1.838161,2.400074,0.157878,15606,13930,17489,12887

4.201337,-1.204410,-31.870021,160.552310,-1.902115,2.391002,0.101245,15606,13930,17489,12887
5.988412,-3.018494,-16.571129,136.277208,-1.937208,2.376849,0.067398,21450,20012,22904,19876
";

    #[test]
    fn parse_skips_comments_and_blank_lines() {
        let records = parse_records(SAMPLE).unwrap();
        assert_eq!(records.len(), 3);
        assert!((records[0].time_s - 3.158590).abs() < 1e-12);
        assert!((records[2].pose.position.x + 3.018494).abs() < 1e-12);
        assert_eq!(records[2].fingers, [21450.0, 20012.0, 22904.0, 19876.0]);
    }

    #[test]
    fn parse_error_reports_file_line() {
        let text = "# header\n\n1,2,3\n";
        let err = parse_records(text).unwrap_err();
        assert!(matches!(err, GraspError::Parse { line: 3, .. }), "{err:?}");
    }

    #[test]
    fn empty_text_yields_no_records() {
        assert!(parse_records("").unwrap().is_empty());
        assert!(parse_records("# only a comment\n\n").unwrap().is_empty());
    }

    #[test]
    fn endpoints_pick_first_and_last() {
        let records = parse_records(SAMPLE).unwrap();
        let (approach, end) = endpoints(&records).unwrap();
        assert_eq!(approach, &records[0]);
        assert_eq!(end, &records[2]);
    }

    #[test]
    fn endpoints_of_single_record_repeat_it() {
        let records = parse_records("0,1,2,3,0,0,0,0,0,0,0").unwrap();
        let (a, b) = endpoints(&records).unwrap();
        assert_eq!(a, b);
        assert!(endpoints(&[]).is_none());
    }

    #[test]
    fn read_records_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tmp file");
        file.write_all(SAMPLE.as_bytes()).expect("write");
        let records = read_records(file.path()).unwrap();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn read_records_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let err = read_records(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, GraspError::Io(_)), "{err:?}");
    }
}
