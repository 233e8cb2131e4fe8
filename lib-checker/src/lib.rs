use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

/// 標準エラー出力へのログを`RUST_LOG`に従って設定する。標準出力は答えの出力に使う。
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// クエリ行の先頭の種別。`0`が更新、`1`が取得。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Update,
    Query,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown query type {0}")]
pub struct UnknownQuery(pub u8);

impl TryFrom<u8> for QueryKind {
    type Error = UnknownQuery;

    fn try_from(t: u8) -> Result<Self, UnknownQuery> {
        match t {
            0 => Ok(Self::Update),
            1 => Ok(Self::Query),
            _ => {
                tracing::error!(t, "unknown query type");
                Err(UnknownQuery(t))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_kind_test() {
        assert_eq!(QueryKind::try_from(0), Ok(QueryKind::Update));
        assert_eq!(QueryKind::try_from(1), Ok(QueryKind::Query));
        assert_eq!(QueryKind::try_from(2), Err(UnknownQuery(2)));
        assert_eq!(UnknownQuery(7).to_string(), "unknown query type 7");
    }
}
