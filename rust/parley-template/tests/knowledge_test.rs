use std::sync::Arc;

use parley_pattern::Category;
use parley_template::{Bot, Frame, Interpreter, Learned, PropertyMap, Session};
use pretty_assertions::assert_eq;

fn evaluate(session: &mut Session, template: &str) -> anyhow::Result<String> {
    let mut frame = Frame::detached("", "", "");
    Ok(Interpreter::new(session).evaluate(template, &mut frame)?)
}

const WHO_LIKES_PIZZA: &str = "<select><vars>?x</vars><q><subj>?x</subj><pred>LIKES</pred><obj>PIZZA</obj></q></select>";

#[test_log::test]
fn select_finds_who_likes_pizza() -> anyhow::Result<()> {
    let mut session = Session::new("tester", Arc::new(Bot::default()));
    assert_eq!(
        evaluate(&mut session, r#"<addtriple subj="Bob" pred="likes" obj="pizza"/>"#)?,
        "triple1"
    );
    assert_eq!(
        evaluate(
            &mut session,
            &format!(r#"<get var="?x"><tuple>{WHO_LIKES_PIZZA}</tuple></get>"#)
        )?,
        "BOB"
    );
    Ok(())
}

#[test]
fn select_without_answers_is_nil() -> anyhow::Result<()> {
    let mut session = Session::new("tester", Arc::new(Bot::default()));
    assert_eq!(evaluate(&mut session, WHO_LIKES_PIZZA)?, "NIL");
    Ok(())
}

#[test]
fn negated_clauses_filter_answers() -> anyhow::Result<()> {
    let mut session = Session::new("tester", Arc::new(Bot::default()));
    evaluate(
        &mut session,
        r#"<addtriple subj="BOB" pred="LIKES" obj="PIZZA"/><addtriple subj="ANN" pred="LIKES" obj="PIZZA"/><addtriple subj="ANN" pred="IS" obj="VEGAN"/>"#,
    )?;
    let template = r#"<get var="?x"><tuple><select><vars>?x</vars><q><subj>?x</subj><pred>LIKES</pred><obj>PIZZA</obj></q><notq><subj>?x</subj><pred>IS</pred><obj>VEGAN</obj></notq></select></tuple></get>"#;
    assert_eq!(evaluate(&mut session, template)?, "BOB");
    Ok(())
}

#[test]
fn tuple_names_last_for_one_request() {
    let bot = Arc::new(Bot::default());
    bot.add_category(Category::new(
        "REMEMBER",
        "*",
        "*",
        r#"<think><addtriple subj="BOB" pred="LIKES" obj="PIZZA"/></think>ok"#,
    ));
    bot.add_category(Category::new("ASK", "*", "*", WHO_LIKES_PIZZA));
    bot.add_category(Category::new("RECALL *", "*", "*", r#"<get var="?x"><tuple><star/></tuple></get>"#));
    let mut session = Session::new("tester", bot);

    session.multisentence_respond("remember");
    let tuple = session.multisentence_respond("ask");
    assert!(tuple.starts_with("tuple"));
    assert_eq!(session.tuples().len(), 1);

    assert_eq!(
        session.multisentence_respond(&format!("recall {tuple}")),
        "unknown"
    );
    assert!(session.tuples().is_empty());
}

#[test]
fn uniq_reads_a_single_value() -> anyhow::Result<()> {
    let mut session = Session::new("tester", Arc::new(Bot::default()));
    evaluate(&mut session, r#"<addtriple subj="PARIS" pred="CAPITALOF" obj="FRANCE"/>"#)?;

    assert_eq!(
        evaluate(&mut session, "<uniq><subj>?city</subj><pred>CAPITALOF</pred><obj>FRANCE</obj></uniq>")?,
        "PARIS"
    );
    assert_eq!(
        evaluate(&mut session, "<uniq><subj>?city</subj><pred>CAPITALOF</pred><obj>SPAIN</obj></uniq>")?,
        "unknown"
    );
    Ok(())
}

#[test]
fn triple_fields_and_deletion() -> anyhow::Result<()> {
    let mut session = Session::new("tester", Arc::new(Bot::default()));
    let id = evaluate(
        &mut session,
        "<addtriple><subj>sky</subj><pred>is</pred><obj>blue</obj></addtriple>",
    )?;

    assert_eq!(
        evaluate(
            &mut session,
            &format!("<subject>{id}</subject> <predicate>{id}</predicate> <object>{id}</object> <object>nope</object>")
        )?,
        "SKY IS BLUE unknown"
    );
    assert_eq!(
        evaluate(&mut session, r#"<addtriple subj="sky" pred="is"/>"#)?,
        "NIL"
    );
    assert_eq!(
        evaluate(&mut session, r#"<deletetriple subj="sky" pred="is" obj="blue"/>"#)?,
        id
    );
    assert_eq!(
        evaluate(&mut session, r#"<deletetriple subj="sky" pred="is" obj="blue"/>"#)?,
        "undefined"
    );
    assert!(session.triples().is_empty());
    Ok(())
}

#[test_log::test]
fn learned_rules_answer_and_can_be_reset() {
    let bot = Arc::new(Bot::default());
    bot.add_category(Category::new(
        "LEARN *",
        "*",
        "*",
        "<learn><category><pattern><eval><star/></eval></pattern><template>I know <eval><star/></eval> &amp; more</template></category></learn>Learned",
    ));
    bot.add_category(Category::new("FORGET", "*", "*", "<resetlearn/>"));
    let mut session = Session::new("tester", Arc::clone(&bot));

    assert_eq!(session.multisentence_respond("learn colors"), "Learned");
    assert_eq!(bot.size(), 3);
    assert_eq!(bot.learned(Learned::Session).len(), 1);
    assert_eq!(session.multisentence_respond("colors"), "I know colors & more");

    assert_eq!(
        session.multisentence_respond("forget"),
        "Deleted Learn Categories"
    );
    assert_eq!(bot.size(), 2);
    assert!(bot.learned(Learned::Session).is_empty());
    assert_eq!(
        session.multisentence_respond("colors"),
        "I have no answer for that."
    );
}

#[test_log::test]
fn reset_forgets_rules_learned_with_bot_placeholders() {
    let mut properties = PropertyMap::default();
    properties.insert("name", "Parley");
    let bot = Arc::new(Bot::default().with_properties(properties));
    bot.add_category(Category::new(
        "INTRODUCE YOURSELF",
        "*",
        "*",
        r#"<learn><category><pattern>WHO IS <bot name="name"/></pattern><template>me</template></category></learn>OK"#,
    ));
    bot.add_category(Category::new("FORGET", "*", "*", "<resetlearn/>"));
    let mut session = Session::new("tester", Arc::clone(&bot));

    assert_eq!(session.multisentence_respond("introduce yourself"), "OK");
    assert_eq!(session.multisentence_respond("who is parley"), "me");

    session.multisentence_respond("forget");
    assert_eq!(bot.size(), 2);
    assert_eq!(
        session.multisentence_respond("who is parley"),
        "I have no answer for that."
    );
}

#[test]
fn learnf_keeps_its_own_record() {
    let bot = Arc::new(Bot::default());
    bot.add_category(Category::new(
        "TEACH * MEANS *",
        "*",
        "*",
        "<learnf><category><pattern><eval><star/></eval></pattern><that>*</that><template><eval><star index=\"2\"/></eval></template></category></learnf>",
    ));
    bot.add_category(Category::new("FORGET", "*", "*", "<resetlearnf/>"));
    let mut session = Session::new("tester", Arc::clone(&bot));

    session.multisentence_respond("teach hola means hello");
    assert_eq!(session.multisentence_respond("hola"), "hello");
    assert_eq!(bot.learned(Learned::Persistent).len(), 1);
    assert!(bot.learned(Learned::Session).is_empty());

    assert_eq!(
        session.multisentence_respond("forget"),
        "Deleted Learnf Categories"
    );
    assert_eq!(
        session.multisentence_respond("hola"),
        "I have no answer for that."
    );
}
