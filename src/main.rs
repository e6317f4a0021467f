//! cjconvert - CSV FOLDER TO JSON CONVERTER
//!
//! 메인 엔트리포인트

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs;

use cjconvert::{
    cli::Args,
    converter::ConvertOptions,
    pattern::PatternMatcher,
    runlog::RunLog,
    runner::{object_type_of, run, scan_csv_files},
    stats::RunStats,
};

fn main() -> Result<()> {
    let args = Args::parse();

    // 입력/출력 폴더 준비
    prepare_directories(&args)?;

    // 헤더 출력
    print_header(&args);

    // 패턴 매처 초기화
    let pattern_matcher =
        PatternMatcher::new(args.pattern.clone()).map_err(|e| anyhow::anyhow!("{}", e))?;

    // 드라이런 모드
    if args.dry_run {
        let csv_files = scan_csv_files(&args.input, &pattern_matcher);
        print_dry_run(&csv_files);
        return Ok(());
    }

    // 실행 로그 준비
    let mut log = RunLog::open(&args.log).context("로그 파일 초기화 실패")?;

    // 변환 실행
    let options = ConvertOptions::new()
        .with_ragged(args.ragged)
        .with_verbose(args.verbose);
    let mut stats = RunStats::new();

    let run_root = run(
        &args.input,
        &args.output,
        &pattern_matcher,
        &options,
        &mut log,
        &mut stats,
    )?;

    // 통계 출력
    stats.print_summary();

    println!(
        "\n{} 변환이 완료되었습니다: {:?}\n",
        "🎉".bright_green(),
        run_root
    );

    Ok(())
}

/// 입력/출력 폴더 준비 (없으면 생성)
fn prepare_directories(args: &Args) -> Result<()> {
    fs::create_dir_all(&args.input)
        .with_context(|| format!("입력 폴더를 만들 수 없습니다: {:?}", args.input))?;
    fs::create_dir_all(&args.output)
        .with_context(|| format!("출력 폴더를 만들 수 없습니다: {:?}", args.output))?;
    Ok(())
}

/// 헤더 출력
fn print_header(args: &Args) {
    println!("\n{}", "═".repeat(50).bright_blue());
    println!(
        "{}",
        " 📦 CSV FOLDER TO JSON CONVERTER".bright_white().bold()
    );
    println!("{}", "═".repeat(50).bright_blue());
    println!("  {} 입력 폴더: {:?}", "📂".bright_cyan(), args.input);
    println!("  {} 출력 폴더: {:?}", "📄".bright_green(), args.output);
    println!("  {} 행 길이 정책: {}", "⚙️".bright_yellow(), args.ragged);

    if let Some(ref pattern) = args.pattern {
        println!("  {} 패턴 필터: {}", "🔍".bright_magenta(), pattern);
    }

    if args.dry_run {
        println!(
            "  {} {}",
            "⚠️".bright_yellow(),
            "드라이런 모드 (실제 변환 없음)".yellow()
        );
    }

    println!("{}", "═".repeat(50).bright_blue());
}

/// 드라이런 출력
fn print_dry_run(csv_files: &[String]) {
    if csv_files.is_empty() {
        println!("\n{}", "⚠️ 처리할 CSV 파일이 없습니다.".yellow());
        return;
    }

    println!("\n{}", "📋 처리 예정 파일 목록:".bright_cyan());
    for (i, name) in csv_files.iter().enumerate() {
        println!("  {}. {} -> {}/", i + 1, name, object_type_of(name));
    }
    println!(
        "\n{} 총 {} 개의 파일이 처리될 예정입니다.",
        "ℹ️".bright_blue(),
        csv_files.len().to_string().bright_green()
    );
}
