//! CLI 인자 파싱 모듈
//!
//! clap을 사용한 명령줄 인자 정의 및 파싱을 담당합니다.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// 셀 수가 헤더와 다른 행(ragged row)의 처리 방식
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum RaggedPolicy {
    /// 짧은 쪽에 맞춰 자르기
    #[default]
    Truncate,
    /// 셀 수가 다르면 해당 행을 오류 처리
    Strict,
    /// 모자란 셀을 빈 문자열로 채우기
    Pad,
}

impl std::fmt::Display for RaggedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RaggedPolicy::Truncate => write!(f, "Truncate"),
            RaggedPolicy::Strict => write!(f, "Strict"),
            RaggedPolicy::Pad => write!(f, "Pad"),
        }
    }
}

/// cjconvert CLI 인자 구조체
#[derive(Parser, Debug)]
#[command(
    name = "cjconvert",
    author = "YourName <your@email.com>",
    version,
    about = "CSV FOLDER TO JSON CONVERTER - CSV 파일을 행 단위 DynamoDB 속성 형식 JSON으로 변환하는 CLI 도구",
    long_about = r#"
CSV FOLDER TO JSON CONVERTER
============================

입력 폴더 바로 아래의 모든 CSV 파일을 읽어 데이터 행 하나당
JSON 파일 하나를 생성합니다. 숫자로만 이루어진 셀은 {"N": ...},
그 외의 셀은 {"S": ...} 형식의 속성 값으로 태깅됩니다.

출력은 실행마다 타임스탬프 루트 폴더로 격리됩니다:
  output/<타임스탬프>/<오브젝트 타입>/<오브젝트 타입>_<고유 ID>.json

특징:
  • 행 단위 독립 처리 (한 행의 실패가 배치를 멈추지 않음)
  • 진행률 표시 및 상세 통계
  • glob 형식의 파일 이름 필터링
  • 셀 수가 다른 행의 처리 정책 선택 (truncate/strict/pad)
  • 타임스탬프가 찍힌 변환 로그

예제:
  cjconvert
  cjconvert -i ./data -o ./converted
  cjconvert -i ./data --pattern "users*.csv" --verbose
  cjconvert -i ./data --ragged strict --dry-run
"#
)]
pub struct Args {
    /// CSV 파일들이 있는 입력 폴더 경로 (없으면 생성)
    #[arg(short, long, default_value = "input")]
    pub input: PathBuf,

    /// 변환 결과가 저장될 출력 폴더 경로 (없으면 생성)
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// 파일 이름 패턴 필터 (glob 형식, 예: "users*.csv", "data?.csv")
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// 셀 수가 헤더와 다른 행의 처리 방식
    #[arg(short, long, value_enum, default_value_t = RaggedPolicy::Truncate)]
    pub ragged: RaggedPolicy,

    /// 상세 출력 모드 (작성된 파일마다 한 줄씩 표시)
    #[arg(short, long)]
    pub verbose: bool,

    /// 실제 변환 없이 처리될 파일 목록만 표시
    #[arg(long)]
    pub dry_run: bool,

    /// 변환 로그 파일 경로
    #[arg(long, default_value = "conversion_log.txt")]
    pub log: PathBuf,
}
