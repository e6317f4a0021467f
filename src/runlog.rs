//! 변환 로그 모듈
//!
//! 실행 단위로 열리는 추가 기록(append) 방식의 텍스트 로그입니다.
//! 전역 로거 대신 명시적으로 생성해 오케스트레이터가 소유하며,
//! 수명은 실행 한 번과 같습니다.

use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{CjConvertError, Result};

/// 실행 범위의 변환 로그
///
/// 한 줄은 `{타임스탬프} - {레벨} - {메시지}` 형식입니다.
pub struct RunLog {
    writer: BufWriter<File>,
}

impl RunLog {
    /// 로그 파일을 추가 기록 모드로 열기 (없으면 생성)
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| CjConvertError::LogOpenError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// 정보 이벤트 기록
    pub fn info(&mut self, message: &str) {
        self.append("INFO", message);
    }

    /// 에러 이벤트 기록
    pub fn error(&mut self, message: &str) {
        self.append("ERROR", message);
    }

    fn append(&mut self, level: &str, message: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        // 로그 쓰기 실패가 변환을 중단시키지 않는다
        let _ = writeln!(self.writer, "{} - {} - {}", timestamp, level, message);
        let _ = self.writer.flush();
    }
}
