//! perft 検証ケースの読み込みと実行
//!
//! ケースは TOML で書く。
//!
//! ```toml
//! [[case]]
//! name = "hirate"
//! sfen = "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1"
//! depth = 3
//! expected = 25470
//! ```

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shogiban_core::Position;
use shogiban_core::movegen::{perft, perft_divide};

/// 検証ケースの一覧
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Suite {
    #[serde(default, rename = "case")]
    pub cases: Vec<Case>,
}

/// 1つの検証ケース
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Case {
    pub name: String,
    pub sfen: String,
    pub depth: u32,
    /// 期待値（省略すると数えるだけ）
    #[serde(default)]
    pub expected: Option<u64>,
}

/// 実行結果
#[derive(Debug, Clone, Serialize)]
pub struct CaseResult {
    pub name: String,
    pub sfen: String,
    pub depth: u32,
    pub nodes: u64,
    pub expected: Option<u64>,
    pub passed: bool,
    pub elapsed_ms: u128,
    pub nps: u64,
}

/// ルートの指し手ごとの結果
#[derive(Debug, Clone, Serialize)]
pub struct DivideEntry {
    #[serde(rename = "move")]
    pub mv: String,
    pub nodes: u64,
}

impl Suite {
    pub fn from_toml_str(text: &str) -> Result<Suite> {
        toml::from_str(text).context("failed to parse perft suite")
    }

    pub fn load(path: &Path) -> Result<Suite> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Suite::from_toml_str(&text).with_context(|| format!("invalid suite {}", path.display()))
    }
}

impl Case {
    /// perft を実行して期待値と比べる
    pub fn run(&self) -> Result<CaseResult> {
        let mut pos = Position::from_sfen(&self.sfen)
            .with_context(|| format!("case {}: invalid SFEN", self.name))?;

        let start = Instant::now();
        let nodes = perft(&mut pos, self.depth);
        let elapsed = start.elapsed();

        let passed = self.expected.is_none_or(|e| e == nodes);
        if !passed {
            log::warn!(
                "case {} depth {}: expected {:?}, got {nodes}",
                self.name,
                self.depth,
                self.expected
            );
        }

        let secs = elapsed.as_secs_f64();
        Ok(CaseResult {
            name: self.name.clone(),
            sfen: self.sfen.clone(),
            depth: self.depth,
            nodes,
            expected: self.expected,
            passed,
            elapsed_ms: elapsed.as_millis(),
            nps: if secs > 0.0 { (nodes as f64 / secs) as u64 } else { 0 },
        })
    }
}

/// ルートの指し手ごとに数える
pub fn divide(sfen: &str, depth: u32) -> Result<Vec<DivideEntry>> {
    let mut pos = Position::from_sfen(sfen).context("invalid SFEN")?;
    Ok(perft_divide(&mut pos, depth)
        .into_iter()
        .map(|(mv, nodes)| DivideEntry {
            mv: mv.to_usi(),
            nodes,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUITE: &str = r#"
[[case]]
name = "hirate"
sfen = "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1"
depth = 2
expected = 900

[[case]]
name = "max_branching"
sfen = "R8/2K1S1SSk/4B4/9/9/9/9/9/1L1L1L3 b RBGSNLP3g3n17p 1"
depth = 1
"#;

    #[test]
    fn test_parse_suite() {
        let suite = Suite::from_toml_str(SUITE).unwrap();
        assert_eq!(suite.cases.len(), 2);
        assert_eq!(suite.cases[0].expected, Some(900));
        assert_eq!(suite.cases[1].expected, None);
    }

    #[test]
    fn test_run_cases() {
        let suite = Suite::from_toml_str(SUITE).unwrap();
        let first = suite.cases[0].run().unwrap();
        assert!(first.passed);
        assert_eq!(first.nodes, 900);

        let second = suite.cases[1].run().unwrap();
        assert!(second.passed);
        assert_eq!(second.nodes, 593);
    }

    #[test]
    fn test_mismatch_is_reported() {
        let case = Case {
            name: "wrong".to_string(),
            sfen: "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1".to_string(),
            depth: 1,
            expected: Some(31),
        };
        let result = case.run().unwrap();
        assert!(!result.passed);
        assert_eq!(result.nodes, 30);
    }

    #[test]
    fn test_invalid_sfen_is_an_error() {
        let case = Case {
            name: "broken".to_string(),
            sfen: "9/9/9 b - 1".to_string(),
            depth: 1,
            expected: None,
        };
        let err = case.run().unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_divide() {
        let entries = divide("lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1", 1)
            .unwrap();
        assert_eq!(entries.len(), 30);
        assert!(entries.iter().all(|e| e.nodes == 1));
        assert!(entries.iter().any(|e| e.mv == "7g7f"));
    }

    #[test]
    fn test_bundled_suite_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("suites/perft.toml");
        let suite = Suite::load(&path).unwrap();
        assert_eq!(suite.cases.len(), 3);
        assert!(suite.cases.iter().all(|c| c.expected.is_some()));
    }
}
