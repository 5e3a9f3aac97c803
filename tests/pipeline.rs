use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use voyeur::{
    concat, fwd, is_end, len_eq, map, noop, pair, Emitter, EventRef, Filter, Observable, Observer,
    Text,
};

/// Records a readable form of every event it sees.
#[derive(Default)]
struct Printer {
    lines: Mutex<Vec<String>>,
}

impl Printer {
    fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl Observer for Printer {
    fn on_event(&self, _ctx: &CancellationToken, ev: &EventRef) {
        let line = if is_end(ev.as_ref()) {
            "End".to_string()
        } else {
            ev.downcast_ref::<Text>()
                .map(Text::to_string)
                .unwrap_or_else(|| format!("<{}>", ev.event_type()))
        };
        self.lines.lock().unwrap().push(line);
    }

    fn name(&self) -> &'static str {
        "printer"
    }
}

async fn wait_until(mut cond: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("condition not met within 5s");
}

#[tokio::test]
async fn cancelled_observer_misses_later_events() {
    let (em, o) = pair();
    let printer = Arc::new(Printer::default());

    let ctx = CancellationToken::new();
    let first = o.register(ctx.child_token(), printer.clone());
    em.emit(&ctx, Text::arc("test"));
    em.emit(&ctx, Text::arc("foo"));

    ctx.cancel();
    wait_until(|| !o.is_registered(first)).await;

    em.emit(&ctx, Text::arc("bar"));

    let forever = CancellationToken::new();
    o.register(forever.clone(), printer.clone());
    em.end(&forever);

    assert_eq!(printer.lines(), vec!["test", "foo", "End"]);
    assert!(o.is_ended());
}

#[tokio::test]
async fn second_observer_only_sees_end() {
    let (em, o) = pair();
    let early = Arc::new(Printer::default());
    let late = Arc::new(Printer::default());

    let ctx = CancellationToken::new();
    o.register(ctx.clone(), early.clone());
    em.emit(&ctx, Text::arc("test"));
    em.emit(&ctx, Text::arc("foo"));
    ctx.cancel();
    wait_until(|| o.is_empty()).await;
    em.emit(&ctx, Text::arc("bar"));

    o.register(CancellationToken::new(), late.clone());
    em.end(&CancellationToken::new());

    assert_eq!(early.lines(), vec!["test", "foo"]);
    assert_eq!(late.lines(), vec!["End"]);
}

#[tokio::test]
async fn concat_pipeline() {
    let ctx = CancellationToken::new();
    let (em, o) = pair();
    let printer = Arc::new(Printer::default());
    o.pipe(ctx.clone(), concat()).register(ctx.clone(), printer.clone());

    for s in ["a", "b", "c"] {
        em.emit(&ctx, Text::arc(s));
    }

    assert_eq!(printer.lines(), vec!["a", "ab", "abc"]);
}

#[tokio::test]
async fn length_filter_built_from_map() {
    let ctx = CancellationToken::new();
    let (em, o) = pair();
    let printer = Arc::new(Printer::default());

    let four = map(|ctx, em, ev| {
        if ev
            .downcast_ref::<Text>()
            .is_some_and(|t| t.as_str().len() == 4)
        {
            em.emit(ctx, Arc::clone(ev));
        }
    });
    o.pipe(ctx.clone(), four).register(ctx.clone(), printer.clone());

    for s in ["1", "12", "123", "1234", "12345", "123456"] {
        em.emit(&ctx, Text::arc(s));
    }
    for s in ["a", "ab", "abc", "abcd", "abcde", "abcdef"] {
        em.emit(&ctx, Text::arc(s));
    }

    assert_eq!(printer.lines(), vec!["1234", "abcd"]);
}

#[tokio::test]
async fn builtin_len_eq_matches_map_version() {
    let ctx = CancellationToken::new();
    let (em, o) = pair();
    let printer = Arc::new(Printer::default());
    o.pipe(ctx.clone(), len_eq(4)).register(ctx.clone(), printer.clone());

    for n in 1..=6 {
        em.emit(&ctx, Text::arc("x".repeat(n)));
    }
    assert_eq!(printer.lines(), vec!["xxxx"]);
}

#[tokio::test]
async fn fwd_and_noop_are_identities() {
    let ctx = CancellationToken::new();
    let (em, o) = pair();
    let through = Arc::new(Printer::default());
    let blocked = Arc::new(Printer::default());

    o.pipe(ctx.clone(), fwd())
        .pipe(ctx.clone(), fwd())
        .register(ctx.clone(), through.clone());
    o.pipe(ctx.clone(), fwd())
        .pipe(ctx.clone(), noop())
        .register(ctx.clone(), blocked.clone());

    let input: Vec<String> = (0..50).map(|i| format!("ev-{i}")).collect();
    for s in &input {
        em.emit(&ctx, Text::arc(s.as_str()));
    }
    em.end(&ctx);

    let mut expected = input.clone();
    expected.push("End".to_string());
    assert_eq!(through.lines(), expected);
    assert!(blocked.lines().is_empty());
}

#[tokio::test]
async fn cancelling_a_stage_unhooks_downstream() {
    let (em, o) = pair();
    let stage_ctx = CancellationToken::new();
    let ctx = CancellationToken::new();
    let printer = Arc::new(Printer::default());

    let stage = fwd();
    let id = o.register(stage_ctx.clone(), Arc::clone(&stage).into_observer());
    stage.register(ctx.clone(), printer.clone());

    em.emit(&ctx, Text::arc("kept"));
    stage_ctx.cancel();
    wait_until(|| !o.is_registered(id)).await;
    em.emit(&ctx, Text::arc("dropped"));

    assert_eq!(printer.lines(), vec!["kept"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn removal_is_eventual_on_multi_thread_runtime() {
    let (em, o) = pair();
    let mut tokens = Vec::new();
    for _ in 0..64 {
        let ctx = CancellationToken::new();
        o.register(ctx.clone(), Arc::new(Printer::default()));
        tokens.push(ctx);
    }
    assert_eq!(em.len(), 64);

    for ctx in tokens.iter().step_by(2) {
        ctx.cancel();
    }
    wait_until(|| em.len() == 32).await;

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(em.len(), 32);
}
