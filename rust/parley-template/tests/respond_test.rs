use std::sync::Arc;

use parley_pattern::Category;
use parley_template::{Bot, EngineConfig, Limits, Session, TEMPLATE_FAILED, TOO_MUCH_RECURSION};
use pretty_assertions::assert_eq;

fn rule(pattern: &str, template: &str) -> Category {
    Category::new(pattern, "*", "*", template)
}

fn session_with(config: EngineConfig, rules: Vec<Category>) -> Session {
    let bot = Bot::new(config);
    for category in rules {
        bot.add_category(category);
    }
    Session::new("tester", Arc::new(bot))
}

fn session(rules: Vec<Category>) -> Session {
    session_with(EngineConfig::default(), rules)
}

#[test_log::test]
fn it_echoes_a_wildcard() -> anyhow::Result<()> {
    let mut session = session(vec![rule("HELLO *", "Hi <star/>")]);
    assert_eq!(session.multisentence_respond("HELLO THERE WORLD"), "Hi THERE WORLD");
    Ok(())
}

#[test_log::test]
fn it_remembers_a_name() -> anyhow::Result<()> {
    let mut session = session(vec![
        rule(
            "MY NAME IS *",
            r#"<think><set name="name"><star/></set></think>OK"#,
        ),
        rule("WHAT IS MY NAME", r#"<get name="name"/>"#),
    ]);

    let replies = ["MY NAME IS BOB", "WHAT IS MY NAME"]
        .map(|request| session.multisentence_respond(request));
    assert_eq!(replies, ["OK", "BOB"]);
    assert_eq!(session.predicates().get("name"), "BOB");
    Ok(())
}

#[test]
fn unmatched_input_gets_the_default_response() {
    let mut session = session(vec![rule("HELLO", "Hi")]);
    assert_eq!(
        session.multisentence_respond("goodbye"),
        "I have no answer for that."
    );
}

#[test]
fn every_sentence_is_answered() {
    let mut session = session(vec![rule("HELLO", "Hi."), rule("HOW ARE YOU", "Fine.")]);
    assert_eq!(session.multisentence_respond("Hello! How are you?"), "Hi. Fine.");
}

#[test]
fn an_empty_request_is_answered_as_no_response() {
    let mut session = session(vec![rule("NORESP", "Say something.")]);
    assert_eq!(session.multisentence_respond("  ...  "), "Say something.");
}

#[test]
fn srai_redispatches() {
    let mut session = session(vec![
        rule("HI *", "<srai>HELLO</srai>"),
        rule("HELLO", "Hello!"),
        rule("HOWDY *", "<sr/>"),
        rule("PARTNER", "Yeehaw"),
    ]);
    assert_eq!(session.multisentence_respond("hi bot"), "Hello!");
    assert_eq!(session.multisentence_respond("howdy partner"), "Yeehaw");
}

#[test_log::test]
fn runaway_srai_stops_at_the_depth_limit() {
    let config = EngineConfig {
        limits: Limits {
            max_recursion_depth: 20,
            ..Limits::default()
        },
        ..EngineConfig::default()
    };
    let mut session = session_with(config, vec![rule("LOOP", "<srai>LOOP</srai>")]);
    assert_eq!(session.multisentence_respond("loop"), TOO_MUCH_RECURSION);
}

#[test]
fn nested_runaway_srai_reaches_the_default_depth_limit() {
    let mut session = session(vec![rule(
        "LOOP",
        "<think><condition><li><srai>LOOP</srai></li></condition></think>",
    )]);
    assert_eq!(session.multisentence_respond("loop"), TOO_MUCH_RECURSION);

    let mut session = self::session(vec![rule("LOOP", "<srai>LOOP</srai>")]);
    assert_eq!(session.multisentence_respond("loop"), TOO_MUCH_RECURSION);
}

#[test_log::test]
fn runaway_srai_stops_at_the_count_limit() {
    let config = EngineConfig {
        limits: Limits {
            max_recursion_count: 5,
            ..Limits::default()
        },
        ..EngineConfig::default()
    };
    let mut session = session_with(
        config,
        vec![
            rule("WIDE", "<srai>STEP</srai><srai>STEP</srai><srai>STEP</srai><srai>STEP</srai><srai>STEP</srai><srai>STEP</srai>"),
            rule("STEP", "x"),
            rule("NARROW", "<srai>STEP</srai><srai>STEP</srai>"),
        ],
    );
    assert_eq!(session.multisentence_respond("wide"), TOO_MUCH_RECURSION);
    // The counter starts over with every sentence.
    assert_eq!(session.multisentence_respond("narrow"), "xx");
}

#[test]
fn malformed_templates_fail_softly() {
    let mut session = session(vec![rule("BROKEN", "<b>unclosed")]);
    assert_eq!(session.multisentence_respond("broken"), TEMPLATE_FAILED);
}

#[test]
fn that_selects_a_follow_up_rule() {
    let mut session = session(vec![
        rule("HI", "Hello there. How are you?"),
        Category::new("FINE", "HOW ARE YOU", "*", "Glad to hear it"),
        rule("FINE", "Fine what?"),
    ]);
    assert_eq!(session.multisentence_respond("fine"), "Fine what?");
    session.multisentence_respond("hi");
    assert_eq!(session.multisentence_respond("fine"), "Glad to hear it");
}

#[test]
fn history_tags_look_back() {
    let mut session = session(vec![
        rule("HI", "Hello there. How are you?"),
        rule("FINE", "Glad to hear it"),
        rule(
            "ECHO",
            r#"<that/>|<that index="2,2"/>|<request/>|<response index="2"/>|<input/>|<input index="2"/>|<input index="9"/>"#,
        ),
    ]);
    session.multisentence_respond("HI");
    session.multisentence_respond("FINE");
    assert_eq!(
        session.multisentence_respond("ECHO"),
        "Glad to hear it|Hello there|FINE|Hello there. How are you?|ECHO|FINE|unknown"
    );
    assert_eq!(session.request(1), Some("ECHO"));
}

#[test]
fn the_topic_selects_rules() {
    let mut session = session(vec![
        rule("LET US TALK ABOUT *", r#"<set name="topic"><star/></set> it is"#),
        Category::new("WHAT DO YOU LIKE", "*", "CATS", "Whiskers"),
        rule("WHAT DO YOU LIKE", "Everything"),
    ]);
    assert_eq!(session.multisentence_respond("what do you like"), "Everything");
    assert_eq!(session.multisentence_respond("let us talk about cats"), "cats it is");
    assert_eq!(session.multisentence_respond("what do you like"), "Whiskers");
}

#[test]
fn repeated_input_is_flagged() {
    let mut session = session(vec![
        rule("HI", "Hello"),
        rule("REPETITIONDETECTED", "You are repeating yourself"),
    ]);
    assert_eq!(session.multisentence_respond("hi"), "Hello");
    assert_eq!(session.multisentence_respond("Hi"), "Hello");
    assert_eq!(session.multisentence_respond("HI"), "You are repeating yourself");
}

#[test]
fn sessions_share_a_bot_across_threads() {
    let bot = Arc::new(Bot::default());
    bot.add_category(rule("MY NAME IS *", r#"<set name="name"><star/></set>"#));
    bot.add_category(rule("WHO AM I", r#"<get name="name"/>"#));

    let names = std::thread::scope(|scope| {
        let handles = ["ALICE", "BOB"].map(|name| {
            let bot = Arc::clone(&bot);
            scope.spawn(move || {
                let mut session = Session::new(name, bot);
                session.multisentence_respond(&format!("my name is {name}"));
                session.multisentence_respond("who am i")
            })
        });
        handles.map(|handle| handle.join().unwrap_or_default())
    });
    assert_eq!(names, ["ALICE", "BOB"]);
}
