use env_logger::{Builder, Env};
use log::LevelFilter;

/// Tracer messages pass at `level`; dependencies (image decoders, tobj) only
/// report warnings. `RUST_LOG` directives are applied on top.
fn builder(level: LevelFilter) -> Builder {
    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Warn)
        .filter_module("phong_tracer", level)
        .format_target(false)
        .parse_env(Env::default());
    builder
}

pub fn init_logger(level: LevelFilter) {
    builder(level).init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Record};

    fn passes(level: LevelFilter, target: &str, at: Level) -> bool {
        let logger = builder(level).build();
        logger.matches(&Record::builder().target(target).level(at).build())
    }

    #[test]
    fn test_tracer_level_applies_to_tracer_only() {
        assert!(passes(LevelFilter::Debug, "phong_tracer::geometries", Level::Debug));
        assert!(!passes(LevelFilter::Info, "phong_tracer::renderer", Level::Debug));
        assert!(!passes(LevelFilter::Debug, "tobj", Level::Info));
        assert!(passes(LevelFilter::Error, "tobj", Level::Warn));
    }
}
