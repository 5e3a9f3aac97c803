//! # Catalog: config-driven pipeline assembly.
//!
//! [`Catalog`] maps filter names to [`FilterBuilder`]s. Given a list of
//! [`StageSpec`]s it builds every stage, then chains them into a
//! [`Pipeline`].
//!
//! ## Rules
//! - All stages are built before any is registered; a bad stage leaves
//!   nothing half-wired.
//! - Stage `i + 1` is registered on stage `i` with the assembly context;
//!   cancelling it unhooks the chain.
//! - The pipeline is itself a filter: events enter the first stage,
//!   observers register on the last one.
//!
//! ## Example
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), voyeur::BuildError> {
//! use tokio_util::sync::CancellationToken;
//! use voyeur::{pair, Catalog, Observable, Param, StageSpec};
//!
//! let ctx = CancellationToken::new();
//! let catalog = Catalog::with_builtins();
//! let pipeline = catalog.assemble(
//!     ctx.clone(),
//!     &[StageSpec::new("prefix", [Param::from("x")]), StageSpec::bare("concat")],
//! )?;
//!
//! let (_em, o) = pair();
//! o.register(ctx.clone(), std::sync::Arc::new(pipeline));
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

use tokio_util::sync::CancellationToken;

use super::builder::{FilterBuilder, Param, ParamKind};
use super::builtin::{concat, len_eq, prefix};
use super::filter::{Filter, FilterRef};
use super::map::{fwd, noop};
use crate::bus::{Observable, ObserverId};
use crate::error::BuildError;
use crate::events::EventRef;
use crate::observers::{Observer, ObserverRef};

/// One stage of a configured pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct StageSpec {
    /// Name of the builder to use.
    pub filter: String,
    /// Arguments for the builder.
    pub args: Vec<Param>,
}

impl StageSpec {
    /// Creates a stage spec.
    pub fn new(filter: impl Into<String>, args: impl Into<Vec<Param>>) -> Self {
        Self {
            filter: filter.into(),
            args: args.into(),
        }
    }

    /// Creates a stage spec without arguments.
    pub fn bare(filter: impl Into<String>) -> Self {
        Self::new(filter, Vec::<Param>::new())
    }
}

/// Registry of named filter builders.
#[derive(Debug, Default)]
pub struct Catalog {
    builders: HashMap<String, FilterBuilder>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog holding the built-in filters:
    ///
    /// | name     | params | filter                      |
    /// |----------|--------|-----------------------------|
    /// | `noop`   | -      | [`noop`](super::noop)       |
    /// | `fwd`    | -      | [`fwd`](super::fwd)         |
    /// | `len_eq` | int    | [`len_eq`](super::len_eq)   |
    /// | `prefix` | str    | [`prefix`](super::prefix)   |
    /// | `concat` | -      | [`concat`](super::concat)   |
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        catalog.register(nullary("noop", noop));
        catalog.register(nullary("fwd", fwd));
        catalog.register(nullary("concat", concat));
        catalog.register(FilterBuilder::new("len_eq", [ParamKind::Int], |args| {
            match args {
                [Param::Int(n)] => usize::try_from(*n).map(len_eq).map_err(|_| {
                    BuildError::InvalidArgument {
                        filter: "len_eq".into(),
                        index: 0,
                        reason: format!("length must be non-negative, got {n}"),
                    }
                }),
                _ => Err(BuildError::ParamMismatch {
                    filter: "len_eq".into(),
                    expected: vec![ParamKind::Int],
                    got: args.iter().map(Param::kind).collect(),
                }),
            }
        }));
        catalog.register(FilterBuilder::new("prefix", [ParamKind::Str], |args| {
            match args {
                [Param::Str(p)] => Ok(prefix(p.as_str())),
                _ => Err(BuildError::ParamMismatch {
                    filter: "prefix".into(),
                    expected: vec![ParamKind::Str],
                    got: args.iter().map(Param::kind).collect(),
                }),
            }
        }));
        catalog
    }

    /// Adds a builder, returning the one it replaced.
    pub fn register(&mut self, builder: FilterBuilder) -> Option<FilterBuilder> {
        self.builders.insert(builder.name().to_string(), builder)
    }

    /// Looks up a builder.
    pub fn get(&self, name: &str) -> Option<&FilterBuilder> {
        self.builders.get(name)
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.builders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Builds a single filter.
    pub fn build(&self, name: &str, args: &[Param]) -> Result<FilterRef, BuildError> {
        self.get(name)
            .ok_or_else(|| BuildError::UnknownFilter {
                name: name.to_string(),
            })?
            .build(args)
    }

    /// Builds every stage and chains them in order.
    pub fn assemble(
        &self,
        ctx: CancellationToken,
        stages: &[StageSpec],
    ) -> Result<Pipeline, BuildError> {
        let filters = stages
            .iter()
            .map(|s| self.build(&s.filter, &s.args))
            .collect::<Result<Vec<_>, _>>()?;

        let (Some(head), Some(tail)) = (filters.first(), filters.last()) else {
            return Err(BuildError::EmptyPipeline);
        };
        let (head, tail) = (head.clone(), tail.clone());

        for pair in filters.windows(2) {
            pair[0].register(ctx.clone(), pair[1].clone().into_observer());
        }

        tracing::debug!(
            stages = filters.len(),
            names = ?stages.iter().map(|s| s.filter.as_str()).collect::<Vec<_>>(),
            "pipeline assembled"
        );

        Ok(Pipeline {
            head,
            tail,
            len: filters.len(),
        })
    }
}

fn nullary(name: &'static str, ctor: fn() -> FilterRef) -> FilterBuilder {
    FilterBuilder::new(name, Vec::<ParamKind>::new(), move |_| Ok(ctor()))
}

/// Chain of filters built by [`Catalog::assemble`].
///
/// Observing the pipeline feeds its first stage; registering on it registers
/// on the last stage.
pub struct Pipeline {
    head: FilterRef,
    tail: FilterRef,
    len: usize,
}

impl Pipeline {
    /// Number of stages.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the pipeline has no stages. Assembly rejects empty stage
    /// lists, so an assembled pipeline is never empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Observer for Pipeline {
    fn on_event(&self, ctx: &CancellationToken, event: &EventRef) {
        self.head.on_event(ctx, event);
    }

    fn name(&self) -> &'static str {
        "pipeline"
    }
}

impl Observable for Pipeline {
    fn register(&self, ctx: CancellationToken, observer: ObserverRef) -> ObserverId {
        self.tail.register(ctx, observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{pair, Emitter};
    use crate::events::Text;
    use crate::observers::ObserverFn;
    use std::sync::{Arc, Mutex};

    fn texts() -> (Arc<Mutex<Vec<String>>>, ObserverRef) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let o: ObserverRef = ObserverFn::arc(move |_: &CancellationToken, ev: &EventRef| {
            if let Some(t) = ev.downcast_ref::<Text>() {
                sink.lock().unwrap().push(t.to_string());
            }
        });
        (seen, o)
    }

    #[test]
    fn test_builtin_names() {
        let catalog = Catalog::with_builtins();
        assert_eq!(
            catalog.names(),
            vec!["concat", "fwd", "len_eq", "noop", "prefix"]
        );
        assert_eq!(catalog.get("len_eq").unwrap().signature(), &[ParamKind::Int]);
    }

    #[test]
    fn test_register_replaces() {
        let mut catalog = Catalog::with_builtins();
        let old = catalog.register(FilterBuilder::new("fwd", [ParamKind::Bool], |_| Ok(fwd())));
        assert!(old.is_some());
        assert_eq!(catalog.get("fwd").unwrap().signature(), &[ParamKind::Bool]);
    }

    #[test]
    fn test_build_errors() {
        let catalog = Catalog::with_builtins();
        assert_eq!(
            catalog.build("nope", &[]).err(),
            Some(BuildError::UnknownFilter {
                name: "nope".into()
            })
        );
        assert_eq!(
            catalog.build("len_eq", &[Param::from("4")]).err().map(|e| e.as_label()),
            Some("build_param_mismatch")
        );
        assert_eq!(
            catalog.build("len_eq", &[Param::Int(-1)]).err().map(|e| e.as_label()),
            Some("build_invalid_argument")
        );
    }

    #[test]
    fn test_empty_pipeline() {
        let catalog = Catalog::with_builtins();
        let err = catalog.assemble(CancellationToken::new(), &[]).err();
        assert_eq!(err, Some(BuildError::EmptyPipeline));
    }

    #[tokio::test]
    async fn test_bad_stage_rejects_whole_pipeline() {
        let catalog = Catalog::with_builtins();
        let err = catalog
            .assemble(
                CancellationToken::new(),
                &[
                    StageSpec::bare("fwd"),
                    StageSpec::new("len_eq", [Param::from(true)]),
                ],
            )
            .err()
            .unwrap();
        assert_eq!(err.as_label(), "build_param_mismatch");
    }

    #[tokio::test]
    async fn test_assembled_pipeline_runs_in_order() {
        let ctx = CancellationToken::new();
        let catalog = Catalog::with_builtins();
        let pipeline = catalog
            .assemble(
                ctx.clone(),
                &[
                    StageSpec::bare("fwd"),
                    StageSpec::new("len_eq", [Param::Int(1)]),
                    StageSpec::bare("concat"),
                ],
            )
            .unwrap();
        assert_eq!(pipeline.len(), 3);
        assert!(!pipeline.is_empty());

        let (seen, sink) = texts();
        let pipeline = Arc::new(pipeline);
        pipeline.register(ctx.clone(), sink);

        let (em, o) = pair();
        o.register(ctx.clone(), pipeline);
        for s in ["a", "bb", "b", "ccc", "c"] {
            em.emit(&ctx, Text::arc(s));
        }

        assert_eq!(*seen.lock().unwrap(), vec!["a", "ab", "abc"]);
    }
}
