//! 실행 오케스트레이션 모듈
//!
//! 입력 폴더 스캔, 타임스탬프 루트 폴더 생성, 파일별 변환 호출을
//! 담당합니다. 파일 하나씩, 행 하나씩 순차 처리합니다.

use chrono::Local;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::converter::{convert_file, ConvertOptions};
use crate::error::{CjConvertError, Result};
use crate::pattern::PatternMatcher;
use crate::runlog::RunLog;
use crate::stats::RunStats;

/// 입력 폴더 바로 아래의 CSV 파일 이름 수집
///
/// 확장자 `.csv`는 대소문자를 구분해 검사합니다. 디렉터리 나열 순서는
/// 파일시스템에 따라 달라지므로 이름순으로 정렬해 순서를 고정합니다.
pub fn scan_csv_files(input_dir: &Path, matcher: &PatternMatcher) -> Vec<String> {
    let mut csv_files: Vec<String> = WalkDir::new(input_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter_map(|e| e.file_name().to_str().map(String::from))
        .filter(|name| name.ends_with(".csv"))
        .filter(|name| matcher.matches(name))
        .collect();

    csv_files.sort();
    csv_files
}

/// CSV 파일 이름에서 오브젝트 타입 유도
///
/// 첫 번째 `.` 앞 구간을 소문자로 바꾼 값으로, 출력 하위 폴더 이름과
/// 출력 파일 접두로 쓰입니다. 예: `Orders.v2.csv` -> `orders`
pub fn object_type_of(csv_filename: &str) -> String {
    csv_filename
        .split('.')
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// 변환 실행
///
/// `output_dir/<타임스탬프>` 루트 폴더를 만들고 스캔된 CSV 파일을
/// 순서대로 변환한 뒤 루트 폴더 경로를 돌려줍니다. 처리할 파일이
/// 없는 실행은 오류가 아니라 빈 성공입니다.
pub fn run(
    input_dir: &Path,
    output_dir: &Path,
    matcher: &PatternMatcher,
    options: &ConvertOptions,
    log: &mut RunLog,
    stats: &mut RunStats,
) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    let run_root = output_dir.join(&timestamp);
    fs::create_dir_all(&run_root).map_err(|e| CjConvertError::FolderCreateError {
        path: run_root.clone(),
        reason: e.to_string(),
    })?;
    log.info(&format!("✅ 루트 출력 폴더 생성: {:?}", run_root));

    println!(
        "\n{}",
        "🔍 입력 폴더에서 CSV 파일을 검색하는 중...".bright_cyan()
    );

    let csv_files = scan_csv_files(input_dir, matcher);
    if csv_files.is_empty() {
        println!("{}", "❌ 입력 폴더에 CSV 파일이 없습니다.".red());
        return Ok(run_root);
    }

    println!(
        "  {} 발견된 파일 수: {}",
        "📋".bright_white(),
        csv_files.len().to_string().bright_green()
    );
    stats.set_total_files(csv_files.len());

    for csv_filename in &csv_files {
        let object_type = object_type_of(csv_filename);
        let outcome = convert_file(
            input_dir,
            &run_root,
            csv_filename,
            &object_type,
            options,
            log,
        )?;
        stats.record_outcome(&outcome);
    }

    Ok(run_root)
}
