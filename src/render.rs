// Phase-keyed HTML rendering. Pure: same session in, same page out.

use minijinja::{context, Environment};

use crate::session::{Phase, Session};

const LAYOUT: &str = include_str!("../templates/layout.html");
const INTAKE: &str = include_str!("../templates/intake.html");
const PREPARING: &str = include_str!("../templates/preparing.html");
const SELECTION: &str = include_str!("../templates/selection.html");
const REVEAL: &str = include_str!("../templates/reveal.html");

/// Template environment with every page compiled in.
pub fn create_environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("layout.html", LAYOUT)?;
    env.add_template("intake.html", INTAKE)?;
    env.add_template("preparing.html", PREPARING)?;
    env.add_template("selection.html", SELECTION)?;
    env.add_template("reveal.html", REVEAL)?;
    Ok(env)
}

pub fn template_for(phase: Phase) -> &'static str {
    match phase {
        Phase::Intake => "intake.html",
        Phase::Preparing => "preparing.html",
        Phase::Selection => "selection.html",
        Phase::Reveal => "reveal.html",
    }
}

/// Render the page for the session's current phase.
/// `notice` carries a one-line message for the seeker, e.g. a rejected empty dilemma.
pub fn render_session(
    env: &Environment<'_>,
    session: &Session,
    notice: Option<&str>,
) -> Result<String, minijinja::Error> {
    let tmpl = env.get_template(template_for(session.phase()))?;
    let cards: Vec<usize> = (1..=session.paths().len()).collect();
    tmpl.render(context! {
        title => "Cosmic Guidance",
        session_id => session.id.to_string(),
        phase => session.phase(),
        dilemma => session.dilemma(),
        cards => cards,
        selected_card => session.selected_index().map(|i| i + 1),
        awaiting => session.is_awaiting_guidance(),
        path => session.selected_path(),
        guidance => session.guidance(),
        notice => notice,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guidance::Guidance;

    #[test]
    fn test_environment_compiles() {
        assert!(create_environment().is_ok());
    }

    #[test]
    fn test_intake_page() {
        let env = create_environment().unwrap();
        let session = Session::new();
        let html = render_session(&env, &session, Some("Share what weighs on you first.")).unwrap();
        assert!(html.contains("What weighs on your mind?"));
        assert!(html.contains(&format!("/session/{}/dilemma", session.id)));
        assert!(html.contains("Share what weighs on you first."));
    }

    #[test]
    fn test_selection_page_shows_fourteen_cards() {
        let env = create_environment().unwrap();
        let mut session = Session::new();
        session.submit_dilemma("I feel lost");
        session.finish_preparing();
        let html = render_session(&env, &session, None).unwrap();
        assert!(html.contains("Choose Your Destiny"));
        assert_eq!(html.matches("name=\"card\"").count(), 14);
        assert!(html.contains("Card 14"));
        assert!(!html.contains("weaving your destiny"));
    }

    #[test]
    fn test_reveal_page() {
        let env = create_environment().unwrap();
        let mut session = Session::new();
        session.submit_dilemma("I feel lost");
        session.finish_preparing();
        let ticket = session.select(0).unwrap();
        session.apply_guidance(&ticket, Guidance::fallback(1));
        let html = render_session(&env, &session, None).unwrap();
        assert!(html.contains("Your Path Revealed"));
        assert!(html.contains("The Flame of Agni"));
        assert!(html.contains("Your dilemma requires bold action."));
        assert!(html.contains("Seek New Guidance"));
    }

    #[test]
    fn test_template_for_each_phase() {
        assert_eq!(template_for(Phase::Intake), "intake.html");
        assert_eq!(template_for(Phase::Preparing), "preparing.html");
        assert_eq!(template_for(Phase::Selection), "selection.html");
        assert_eq!(template_for(Phase::Reveal), "reveal.html");
    }
}
