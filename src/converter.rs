//! CSV 파일 변환 모듈
//!
//! 개별 CSV 파일을 행 단위 JSON 파일들로 변환합니다.
//! 파일 하나의 처리 실패가 배치 전체를, 행 하나의 실패가 파일 전체를
//! 멈추지 않습니다. 출력 하위 폴더 생성 실패만 치명적입니다.

use colored::Colorize;
use csv::{ReaderBuilder, StringRecord};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;

use crate::cli::RaggedPolicy;
use crate::error::{CjConvertError, Result};
use crate::record::build_record;
use crate::runlog::RunLog;

/// 파일 변환 결과
#[derive(Debug)]
pub struct FileOutcome {
    /// 처리한 CSV 파일 이름
    pub csv_file: String,
    /// 전체 데이터 행 수
    pub rows_total: usize,
    /// JSON으로 작성된 행 수
    pub rows_written: usize,
    /// 실패한 행의 (행 번호, 에러 메시지) 목록
    pub row_errors: Vec<(usize, String)>,
    /// 쓴 총 바이트
    pub bytes_written: u64,
    /// 파일 단위로 건너뛴 경우 그 이유
    pub skipped: Option<String>,
}

impl FileOutcome {
    /// 변환 시작 상태의 결과 생성 (행 처리 결과는 이후 누적)
    pub fn converted(csv_file: &str, rows_total: usize) -> Self {
        Self {
            csv_file: csv_file.to_string(),
            rows_total,
            rows_written: 0,
            row_errors: Vec::new(),
            bytes_written: 0,
            skipped: None,
        }
    }

    /// 파일 단위 스킵 결과 생성
    pub fn skipped(csv_file: &str, reason: String) -> Self {
        Self {
            csv_file: csv_file.to_string(),
            rows_total: 0,
            rows_written: 0,
            row_errors: Vec::new(),
            bytes_written: 0,
            skipped: Some(reason),
        }
    }

    /// 파일 단위로 건너뛰었는지 확인
    pub fn is_skipped(&self) -> bool {
        self.skipped.is_some()
    }
}

/// 변환 옵션
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// 셀 수가 헤더와 다른 행의 처리 방식
    pub ragged: RaggedPolicy,
    /// 행 단위 진행률 바 표시 여부
    pub show_progress: bool,
    /// 작성된 파일마다 한 줄씩 출력
    pub verbose: bool,
}

impl ConvertOptions {
    /// 기본 옵션 생성
    pub fn new() -> Self {
        Self {
            show_progress: true,
            ..Default::default()
        }
    }

    /// 행 길이 정책 설정
    pub fn with_ragged(mut self, ragged: RaggedPolicy) -> Self {
        self.ragged = ragged;
        self
    }

    /// 진행률 바 표시 설정
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// 상세 출력 설정
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// 단일 CSV 파일을 행 단위 JSON 파일로 변환
///
/// 각 데이터 행은 `{오브젝트 타입}_{첫 번째 셀}.json` 파일이 되어
/// `output_root/object_type/` 아래에 기록됩니다. 같은 이름의 기존
/// 파일은 덮어씁니다.
pub fn convert_file(
    input_dir: &Path,
    output_root: &Path,
    csv_filename: &str,
    object_type: &str,
    options: &ConvertOptions,
    log: &mut RunLog,
) -> Result<FileOutcome> {
    let input_path = input_dir.join(csv_filename);

    if !input_path.exists() {
        println!(
            "{}",
            format!(
                "⚠️ {} 파일이 {:?} 안에 없습니다. 건너뜁니다...",
                csv_filename, input_dir
            )
            .yellow()
        );
        log.info(&format!("⚠️ 건너뜀 (파일 없음): {}", csv_filename));
        return Ok(FileOutcome::skipped(
            csv_filename,
            format!("{} 파일이 입력 폴더에 없습니다", csv_filename),
        ));
    }

    let object_dir = output_root.join(object_type);
    fs::create_dir_all(&object_dir).map_err(|e| CjConvertError::FolderCreateError {
        path: object_dir.clone(),
        reason: e.to_string(),
    })?;
    log.info(&format!("✅ 폴더 생성: {:?}", object_dir));

    // 셀 수가 다른 행은 파서가 아니라 정책이 처리하므로 flexible
    let mut reader = match ReaderBuilder::new().flexible(true).from_path(&input_path) {
        Ok(reader) => reader,
        Err(e) => return Ok(skip_unreadable(csv_filename, &input_path, &e.to_string(), log)),
    };

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => return Ok(skip_unreadable(csv_filename, &input_path, &e.to_string(), log)),
    };

    if headers.is_empty() {
        let reason = CjConvertError::EmptyFile {
            file: input_path.clone(),
        }
        .to_string();
        println!(
            "{}",
            format!("❌ {} 파일이 비어 있습니다. 건너뜁니다...", csv_filename).red()
        );
        log.error(&format!("❌ 건너뜀 (빈 파일): {}", csv_filename));
        return Ok(FileOutcome::skipped(csv_filename, reason));
    }

    let rows: Vec<csv::Result<StringRecord>> = reader.records().collect();
    if rows.is_empty() {
        let reason = CjConvertError::NoDataRows {
            file: input_path.clone(),
        }
        .to_string();
        println!(
            "{}",
            format!(
                "❌ {} 파일에 데이터 행이 없습니다. 건너뜁니다...",
                csv_filename
            )
            .red()
        );
        log.error(&format!("❌ 건너뜀 (데이터 행 없음): {}", csv_filename));
        return Ok(FileOutcome::skipped(csv_filename, reason));
    }

    let pb = create_progress_bar(rows.len(), csv_filename, options.show_progress);
    let mut outcome = FileOutcome::converted(csv_filename, rows.len());

    for (index, row_result) in rows.into_iter().enumerate() {
        let row_number = index + 1;
        match write_row(&headers, row_result, row_number, object_type, &object_dir, options) {
            Ok((output_filename, bytes)) => {
                outcome.rows_written += 1;
                outcome.bytes_written += bytes;
                log.info(&format!("✅ 처리 완료: {}", output_filename));

                if options.verbose {
                    println!("  {} {}", "✓".green(), output_filename);
                }
            }
            Err(e) => {
                log.error(&format!(
                    "❌ 처리 실패 ({} {}행): {}",
                    csv_filename, row_number, e
                ));
                println!(
                    "{}",
                    format!(
                        "⚠️ {} {}행 처리 중 오류가 발생했습니다. 로그를 확인하세요.",
                        csv_filename, row_number
                    )
                    .red()
                );
                outcome.row_errors.push((row_number, e.to_string()));
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("완료!");
    Ok(outcome)
}

/// 데이터 행 하나를 JSON 파일로 기록
///
/// 성공 시 (출력 파일 이름, 쓴 바이트 수)를 돌려줍니다.
fn write_row(
    headers: &StringRecord,
    row_result: csv::Result<StringRecord>,
    row_number: usize,
    object_type: &str,
    object_dir: &Path,
    options: &ConvertOptions,
) -> Result<(String, u64)> {
    let row = row_result.map_err(|e| CjConvertError::RowParseError {
        row: row_number,
        reason: e.to_string(),
    })?;

    let record = build_record(headers, &row, row_number, options.ragged)?;

    // 첫 번째 셀 원문이 고유 식별자
    let unique_id = row.get(0).unwrap_or_default();
    validate_identifier(unique_id)?;

    let output_filename = format!("{}_{}.json", object_type, unique_id);
    let output_path = object_dir.join(&output_filename);

    let json =
        serde_json::to_string_pretty(&record).map_err(|e| CjConvertError::SerializeError {
            reason: e.to_string(),
        })?;
    let bytes = json.len() as u64;

    fs::write(&output_path, json).map_err(|e| CjConvertError::WriteError {
        path: output_path.clone(),
        reason: e.to_string(),
    })?;

    Ok((output_filename, bytes))
}

/// 경로 구분자나 NUL이 섞인 식별자는 파일 이름으로 쓰지 않는다
fn validate_identifier(id: &str) -> Result<()> {
    if id.contains(['/', '\\', '\0']) {
        return Err(CjConvertError::UnsafeIdentifier { id: id.to_string() });
    }
    Ok(())
}

/// 읽을 수 없는 파일을 건너뛰는 공통 처리
fn skip_unreadable(
    csv_filename: &str,
    input_path: &Path,
    reason: &str,
    log: &mut RunLog,
) -> FileOutcome {
    let error = CjConvertError::FileOpenError {
        file: input_path.to_path_buf(),
        reason: reason.to_string(),
    };
    println!(
        "{}",
        format!("❌ {} 파일을 읽을 수 없습니다: {}", csv_filename, reason).red()
    );
    log.error(&format!("❌ 건너뜀 (읽기 실패): {}: {}", csv_filename, reason));
    FileOutcome::skipped(csv_filename, error.to_string())
}

/// 행 단위 진행률 바 생성
fn create_progress_bar(total: usize, csv_filename: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)")
            .unwrap()
            .progress_chars("█▓▒░"),
    );
    pb.set_message(format!("🔄 {}", csv_filename));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn create_csv(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn test_setup() -> (TempDir, RunLog) {
        let temp_dir = TempDir::new().unwrap();
        let log = RunLog::open(&temp_dir.path().join("conversion_log.txt")).unwrap();
        (temp_dir, log)
    }

    fn quiet_options() -> ConvertOptions {
        ConvertOptions::new().with_progress(false)
    }

    #[test]
    fn test_convert_file_writes_row_files() {
        let (temp_dir, mut log) = test_setup();
        create_csv(temp_dir.path(), "users.csv", "id,name\n1,Alice\n2,\"Bob\"\n");

        let outcome = convert_file(
            temp_dir.path(),
            temp_dir.path(),
            "users.csv",
            "users",
            &quiet_options(),
            &mut log,
        )
        .unwrap();

        assert!(!outcome.is_skipped());
        assert_eq!(outcome.rows_total, 2);
        assert_eq!(outcome.rows_written, 2);
        assert!(outcome.row_errors.is_empty());

        let content =
            fs::read_to_string(temp_dir.path().join("users").join("users_1.json")).unwrap();
        let value: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value, json!({"id": {"N": "1"}, "name": {"S": "Alice"}}));

        // 키 순서는 헤더 순서, 들여쓰기는 2칸
        assert!(content.find("\"id\"").unwrap() < content.find("\"name\"").unwrap());
        assert!(content.starts_with("{\n  \"id\""));

        let content =
            fs::read_to_string(temp_dir.path().join("users").join("users_2.json")).unwrap();
        let value: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value, json!({"id": {"N": "2"}, "name": {"S": "Bob"}}));
    }

    #[test]
    fn test_convert_file_missing_input_is_skip() {
        let (temp_dir, mut log) = test_setup();

        let outcome = convert_file(
            temp_dir.path(),
            temp_dir.path(),
            "ghost.csv",
            "ghost",
            &quiet_options(),
            &mut log,
        )
        .unwrap();

        assert!(outcome.is_skipped());
        assert!(!temp_dir.path().join("ghost").exists());
    }

    #[test]
    fn test_convert_file_empty_file_is_skip() {
        let (temp_dir, mut log) = test_setup();
        create_csv(temp_dir.path(), "empty.csv", "");

        let outcome = convert_file(
            temp_dir.path(),
            temp_dir.path(),
            "empty.csv",
            "empty",
            &quiet_options(),
            &mut log,
        )
        .unwrap();

        assert!(outcome.is_skipped());
        // 하위 폴더는 만들어지지만 내용물은 없다
        let entries: Vec<_> = fs::read_dir(temp_dir.path().join("empty"))
            .unwrap()
            .collect();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_convert_file_header_only_is_skip() {
        let (temp_dir, mut log) = test_setup();
        create_csv(temp_dir.path(), "users.csv", "id,name\n");

        let outcome = convert_file(
            temp_dir.path(),
            temp_dir.path(),
            "users.csv",
            "users",
            &quiet_options(),
            &mut log,
        )
        .unwrap();

        assert!(outcome.is_skipped());
        let entries: Vec<_> = fs::read_dir(temp_dir.path().join("users"))
            .unwrap()
            .collect();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_convert_file_unsafe_id_skips_row_only() {
        let (temp_dir, mut log) = test_setup();
        create_csv(temp_dir.path(), "users.csv", "id,name\nbad/1,X\n2,Y\n");

        let outcome = convert_file(
            temp_dir.path(),
            temp_dir.path(),
            "users.csv",
            "users",
            &quiet_options(),
            &mut log,
        )
        .unwrap();

        assert_eq!(outcome.rows_total, 2);
        assert_eq!(outcome.rows_written, 1);
        assert_eq!(outcome.row_errors.len(), 1);
        assert_eq!(outcome.row_errors[0].0, 1);

        assert!(temp_dir.path().join("users").join("users_2.json").exists());
    }

    #[test]
    fn test_convert_file_overwrites_existing_output() {
        let (temp_dir, mut log) = test_setup();
        create_csv(temp_dir.path(), "users.csv", "id,name\n1,Alice\n");

        let options = quiet_options();
        convert_file(
            temp_dir.path(),
            temp_dir.path(),
            "users.csv",
            "users",
            &options,
            &mut log,
        )
        .unwrap();

        create_csv(temp_dir.path(), "users.csv", "id,name\n1,Bob\n");
        convert_file(
            temp_dir.path(),
            temp_dir.path(),
            "users.csv",
            "users",
            &options,
            &mut log,
        )
        .unwrap();

        let content =
            fs::read_to_string(temp_dir.path().join("users").join("users_1.json")).unwrap();
        assert!(content.contains("Bob"));
        assert!(!content.contains("Alice"));
    }

    #[test]
    fn test_convert_file_strict_policy_reports_ragged_rows() {
        let (temp_dir, mut log) = test_setup();
        create_csv(temp_dir.path(), "users.csv", "id,name\n1\n2,Bob\n");

        let options = quiet_options().with_ragged(RaggedPolicy::Strict);
        let outcome = convert_file(
            temp_dir.path(),
            temp_dir.path(),
            "users.csv",
            "users",
            &options,
            &mut log,
        )
        .unwrap();

        assert_eq!(outcome.rows_written, 1);
        assert_eq!(outcome.row_errors.len(), 1);
        assert!(outcome.row_errors[0].1.contains("셀 수가 헤더와 다릅니다"));
    }

    #[test]
    fn test_convert_file_pad_policy_fills_missing_cells() {
        let (temp_dir, mut log) = test_setup();
        create_csv(temp_dir.path(), "users.csv", "id,name\n1\n");

        let options = quiet_options().with_ragged(RaggedPolicy::Pad);
        convert_file(
            temp_dir.path(),
            temp_dir.path(),
            "users.csv",
            "users",
            &options,
            &mut log,
        )
        .unwrap();

        let content =
            fs::read_to_string(temp_dir.path().join("users").join("users_1.json")).unwrap();
        let value: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value, json!({"id": {"N": "1"}, "name": {"S": ""}}));
    }

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("123").is_ok());
        assert!(validate_identifier("user-1_a.b").is_ok());
        assert!(validate_identifier("").is_ok());
        assert!(validate_identifier("a/b").is_err());
        assert!(validate_identifier("a\\b").is_err());
        assert!(validate_identifier("a\0b").is_err());
    }
}
