//! 통계 및 유틸리티 모듈
//!
//! 실행 통계 수집 및 포맷팅을 담당합니다.

use colored::Colorize;
use std::time::{Duration, Instant};

use crate::converter::FileOutcome;

/// 실행 통계 구조체
///
/// 처리는 단일 스레드 순차 실행이므로 일반 카운터로 충분합니다.
#[derive(Debug)]
pub struct RunStats {
    /// 발견된 CSV 파일 수
    pub total_files: usize,
    /// 변환된 파일 수
    pub files_converted: usize,
    /// 건너뛴 파일 수
    pub files_skipped: usize,
    /// 작성된 행(JSON 파일) 수
    pub rows_written: usize,
    /// 행 단위 오류 수
    pub row_errors: usize,
    /// 쓴 총 바이트
    pub bytes_written: u64,
    /// 처리 시작 시간
    start_time: Instant,
}

impl RunStats {
    /// 새 통계 인스턴스 생성
    pub fn new() -> Self {
        Self {
            total_files: 0,
            files_converted: 0,
            files_skipped: 0,
            rows_written: 0,
            row_errors: 0,
            bytes_written: 0,
            start_time: Instant::now(),
        }
    }

    /// 발견된 파일 수 설정
    pub fn set_total_files(&mut self, total_files: usize) {
        self.total_files = total_files;
    }

    /// 파일 변환 결과를 통계에 반영
    pub fn record_outcome(&mut self, outcome: &FileOutcome) {
        if outcome.is_skipped() {
            self.files_skipped += 1;
            return;
        }

        self.files_converted += 1;
        self.rows_written += outcome.rows_written;
        self.row_errors += outcome.row_errors.len();
        self.bytes_written += outcome.bytes_written;
    }

    /// 경과 시간 반환
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// 처리 통계 요약 출력
    pub fn print_summary(&self) {
        println!("\n{}", "═".repeat(50).bright_blue());
        println!("{}", " 📊 변환 통계".bright_white().bold());
        println!("{}", "═".repeat(50).bright_blue());

        println!(
            "  {} 전체 파일:    {}",
            "📁".bright_cyan(),
            self.total_files
        );
        println!(
            "  {} 변환 완료:    {}",
            "✅".bright_green(),
            self.files_converted.to_string().green()
        );

        if self.files_skipped > 0 {
            println!(
                "  {} 건너뜀:       {}",
                "⚠️".bright_yellow(),
                self.files_skipped.to_string().yellow()
            );
        } else {
            println!("  {} 건너뜀:       {}", "✅".bright_green(), "0".green());
        }

        println!(
            "  {} 작성된 행:    {}",
            "📄".bright_white(),
            self.rows_written.to_string().green()
        );

        if self.row_errors > 0 {
            println!(
                "  {} 행 오류:      {}",
                "❌".bright_red(),
                self.row_errors.to_string().red()
            );
        } else {
            println!("  {} 행 오류:      {}", "✅".bright_green(), "0".green());
        }

        println!(
            "  {} 출력 용량:    {}",
            "📤".bright_magenta(),
            format_bytes(self.bytes_written)
        );
        println!(
            "  {} 처리 시간:    {}",
            "⏱️".bright_cyan(),
            format_duration(self.elapsed())
        );

        println!("{}", "═".repeat(50).bright_blue());
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

/// 바이트를 읽기 쉬운 형식으로 변환
///
/// # Examples
/// ```
/// use cjconvert::stats::format_bytes;
///
/// assert_eq!(format_bytes(500), "500 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1048576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// 경과 시간을 읽기 쉬운 형식으로 변환
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs >= 3600 {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}시간 {}분", hours, mins)
    } else if secs >= 60 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        format!("{}분 {}초", mins, remaining_secs)
    } else if secs > 0 {
        format!("{}.{:03}초", secs, millis)
    } else {
        format!("{}ms", millis)
    }
}
