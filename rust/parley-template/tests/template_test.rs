use std::sync::Arc;

use parley_pattern::Category;
use parley_template::{
    Bot, Element, EngineConfig, EvalError, Frame, Interpreter, Limits, MapRegistry, PreProcessor,
    PropertyMap, Session, SubstitutionList, Substitutions, TOO_MUCH_LOOPING, TagHandler,
};
use pretty_assertions::assert_eq;

fn qa_bot() -> Bot {
    Bot::new(EngineConfig {
        qa_test_mode: true,
        ..EngineConfig::default()
    })
}

fn evaluate(session: &mut Session, template: &str) -> anyhow::Result<String> {
    let mut frame = Frame::detached("", "", "");
    Ok(Interpreter::new(session).evaluate(template, &mut frame)?)
}

fn reply(bot: Bot, template: &str) -> anyhow::Result<String> {
    let mut session = Session::new("tester", Arc::new(bot));
    evaluate(&mut session, template)
}

#[test]
fn random_picks_the_first_item_in_qa_mode() -> anyhow::Result<()> {
    assert_eq!(
        reply(qa_bot(), "<random><li>a</li><li>b</li></random>")?,
        "a"
    );
    Ok(())
}

#[test]
fn random_picks_one_of_its_items() -> anyhow::Result<()> {
    let picked = reply(Bot::default(), "<random><li>a</li><li>b</li></random>")?;
    assert!(picked == "a" || picked == "b");
    Ok(())
}

#[test]
fn an_empty_random_contributes_nothing() -> anyhow::Result<()> {
    assert_eq!(reply(Bot::default(), "[<random/>]")?, "[]");
    Ok(())
}

#[test]
fn unknown_tags_pass_through() -> anyhow::Result<()> {
    assert_eq!(
        reply(
            Bot::default(),
            r#"Say <b class="x">hi <uppercase>there</uppercase></b><br/>"#
        )?,
        r#"Say <b class="x">hi THERE</b><br/>"#
    );
    Ok(())
}

#[test]
fn set_and_get_predicates_and_variables() -> anyhow::Result<()> {
    let mut session = Session::new("tester", Arc::new(Bot::default()));
    let output = evaluate(
        &mut session,
        r#"<set name="color">  red  </set>/<set var="size">big</set>/<get var="size"/>/<get var="missing"/>"#,
    )?;
    assert_eq!(output, "red/big/big/unknown");
    assert_eq!(session.predicates().get("color"), "red");
    assert_eq!(evaluate(&mut session, r#"<get><name>color</name></get>"#)?, "red");
    // Variables belong to one evaluation.
    assert_eq!(evaluate(&mut session, r#"<get var="size"/>"#)?, "unknown");
    Ok(())
}

#[test]
fn set_answers_with_the_name_of_a_pronoun() -> anyhow::Result<()> {
    let bot = Bot::new(EngineConfig {
        pronouns: vec!["he".to_owned()],
        ..EngineConfig::default()
    });
    assert_eq!(reply(bot, r#"<set name="he">Bob</set>"#)?, "he");
    Ok(())
}

#[test]
fn condition_with_a_single_value() -> anyhow::Result<()> {
    let mut session = Session::new("tester", Arc::new(Bot::default()));
    session.predicates_mut().set("mood", "HAPPY");
    assert_eq!(
        evaluate(&mut session, r#"<condition name="mood" value="happy">Yay</condition>"#)?,
        "Yay"
    );
    assert_eq!(
        evaluate(&mut session, r#"<condition name="mood" value="sad">Aw</condition>"#)?,
        ""
    );
    Ok(())
}

#[test]
fn condition_with_branches() -> anyhow::Result<()> {
    let mut session = Session::new("tester", Arc::new(Bot::default()));
    let template = r#"<condition name="mood"><li value="sad">Aw</li><li value="happy">Yay</li><li>Hm</li></condition>"#;

    assert_eq!(evaluate(&mut session, template)?, "Hm");
    session.predicates_mut().set("mood", "happy");
    assert_eq!(evaluate(&mut session, template)?, "Yay");
    Ok(())
}

#[test]
fn condition_branches_name_their_own_predicates() -> anyhow::Result<()> {
    let mut session = Session::new("tester", Arc::new(Bot::default()));
    let template = r#"<condition><li name="mood" value="*">set</li><li><name>weather</name><value>rain</value>wet</li><li>unset</li></condition>"#;

    assert_eq!(evaluate(&mut session, template)?, "unset");
    session.predicates_mut().set("weather", "rain");
    assert_eq!(evaluate(&mut session, template)?, "wet");
    session.predicates_mut().set("mood", "calm");
    assert_eq!(evaluate(&mut session, template)?, "set");
    Ok(())
}

#[test]
fn condition_loops_until_a_branch_stops() -> anyhow::Result<()> {
    let template = r#"<think><set var="n">0</set></think><condition var="n"><li value="3">done</li><li><think><set var="n"><map name="successor"><get var="n"/></map></set></think><get var="n"/>,<loop/></li></condition>"#;
    assert_eq!(reply(Bot::default(), template)?, "1,2,3,done");
    Ok(())
}

#[test_log::test]
fn condition_gives_up_after_the_loop_limit() -> anyhow::Result<()> {
    let bot = Bot::new(EngineConfig {
        limits: Limits {
            max_loops: 5,
            ..Limits::default()
        },
        ..EngineConfig::default()
    });
    assert_eq!(
        reply(bot, "<condition><li>again<loop/></li></condition>")?,
        TOO_MUCH_LOOPING
    );
    Ok(())
}

#[test]
fn stars_read_the_match() -> anyhow::Result<()> {
    let bot = Arc::new(Bot::default());
    bot.add_category(Category::new(
        "* LIKES *",
        "*",
        "*",
        r#"<star index="2"/> by <star/>|<star index="3"/>|<thatstar/>|<topicstar/>"#,
    ));
    let mut session = Session::new("tester", bot);
    assert_eq!(
        session.multisentence_respond("Alice likes green tea"),
        "green tea by Alice||unknown|unknown"
    );
    Ok(())
}

#[test]
fn transforms_reshape_text() -> anyhow::Result<()> {
    assert_eq!(
        reply(
            Bot::default(),
            "<uppercase>a</uppercase><lowercase>B</lowercase> <formal>jane doe</formal> <sentence>well then</sentence> <explode>abc</explode>"
        )?,
        "Ab Jane Doe Well then a b c"
    );
    assert_eq!(
        reply(
            Bot::default(),
            "<first>alpha beta gamma</first>/<rest>alpha beta gamma</rest>/<rest>alpha</rest>"
        )?,
        "alpha/beta gamma/NIL"
    );
    Ok(())
}

#[test]
fn person_swaps_pronouns() -> anyhow::Result<()> {
    let mut preprocessor = PreProcessor::default();
    preprocessor.set(
        Substitutions::Person,
        SubstitutionList::new([(" I ", " you "), (" my ", " your ")])?,
    );
    let bot = Arc::new(Bot::default().with_preprocessor(preprocessor));
    bot.add_category(Category::new("YOU SAID *", "*", "*", "I said <person/>?"));
    let mut session = Session::new("tester", Arc::clone(&bot));

    assert_eq!(
        evaluate(&mut session, "<person>I like my dog</person>")?,
        "you like your dog"
    );
    assert_eq!(
        session.multisentence_respond("you said I lost my keys"),
        "I said you lost your keys?"
    );
    Ok(())
}

#[test]
fn bot_properties_and_maps() -> anyhow::Result<()> {
    let mut properties = PropertyMap::default();
    properties.insert("name", "Parley");
    let mut maps = MapRegistry::default();
    maps.insert("capital", [("france", "Paris")]);
    let bot = Bot::default().with_properties(properties).with_maps(maps);

    assert_eq!(
        reply(
            bot,
            r#"<bot name="name"/>|<bot name="age"/>|<map name="capital">France</map>|<map name="capital">Spain</map>|<map name="successor">41</map>|<map>raw</map>"#
        )?,
        "Parley|unknown|Paris|unknown|42|<map>raw</map>"
    );
    Ok(())
}

#[test]
fn bot_properties_fill_pattern_placeholders() {
    let mut properties = PropertyMap::default();
    properties.insert("name", "Parley");
    let bot = Arc::new(Bot::default().with_properties(properties));
    bot.add_category(Category::new(
        r#"HELLO <bot name="name"/>"#,
        "*",
        "*",
        "Hello yourself",
    ));
    let mut session = Session::new("tester", bot);
    assert_eq!(session.multisentence_respond("hello parley"), "Hello yourself");
}

#[test]
fn graph_information_tags() -> anyhow::Result<()> {
    let bot = Arc::new(Bot::default());
    bot.add_category(Category::new("HELLO WORLD", "*", "*", "x"));
    bot.add_category(Category::new("HELLO", "*", "*", "y"));
    let mut session = Session::new("client-7", bot);

    let output = evaluate(&mut session, "<id/>|<size/>|<program/>")?;
    assert_eq!(
        output,
        format!("client-7|2|Parley {}", env!("CARGO_PKG_VERSION"))
    );
    let vocabulary = evaluate(&mut session, "<vocabulary/>")?.parse::<usize>()?;
    assert!(vocabulary >= 2);
    Ok(())
}

struct Shout;

impl TagHandler for Shout {
    fn evaluate(
        &self,
        element: &Element,
        interpreter: &mut Interpreter<'_>,
        frame: &mut Frame,
    ) -> Result<String, EvalError> {
        Ok(format!(
            "{}!",
            interpreter.eval_content(element, frame)?.to_uppercase()
        ))
    }
}

struct Refuse;

impl TagHandler for Refuse {
    fn evaluate(
        &self,
        _element: &Element,
        _interpreter: &mut Interpreter<'_>,
        _frame: &mut Frame,
    ) -> Result<String, EvalError> {
        Err(EvalError::tag("refuse", "not today"))
    }
}

#[test_log::test]
fn extensions_handle_unknown_tags() -> anyhow::Result<()> {
    let bot = Bot::default()
        .with_extension("shout", Shout)
        .with_extension("refuse", Refuse);
    assert_eq!(
        reply(bot, "<shout>hey <lowercase>YOU</lowercase></shout> [<refuse/>]")?,
        "HEY YOU! []"
    );
    Ok(())
}

#[test]
fn extensions_never_shadow_built_in_tags() -> anyhow::Result<()> {
    let bot = Bot::default().with_extension("uppercase", Refuse);
    assert_eq!(reply(bot, "<uppercase>a</uppercase>")?, "A");
    Ok(())
}
