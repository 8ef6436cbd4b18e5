// ============================================================
// Layer 1 — Web Page
// ============================================================
// The single HTML page: question form, response panel, and the
// clickable example questions. The reply arrives as Markdown and
// is turned into HTML here; the template escapes everything else.

use anyhow::Result;
use minijinja::{context, Environment};
use pulldown_cmark::{html, Event, Options, Parser};

pub const TITLE: &str = "Menstrual Health Chatbot";

pub const DESCRIPTION: &str = "Ask me anything about menstrual health! I'm here to provide accurate, \
helpful information about periods, menstrual cycles, and related topics.";

pub const EXAMPLE_QUESTIONS: [&str; 10] = [
    "What is a normal menstrual cycle length?",
    "How can I alleviate menstrual cramps?",
    "What are the signs of a heavy menstrual flow?",
    "Is it normal to experience mood swings during menstruation?",
    "What are some natural remedies for PMS?",
    "How do I track my menstrual cycle effectively?",
    "What is endometriosis?",
    "What are the symptoms of PCOS?",
    "When does menstruation typically begin?",
    "How much blood is lost during menstruation?",
];

const TEMPLATE_NAME: &str = "index.html";

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{ title }}</title>
<style>
  body { font-family: system-ui, sans-serif; background: #f7f7fb; margin: 0; }
  .container { max-width: 800px; margin: auto; padding: 1.5em; }
  .title { text-align: center; color: #2E8B57; font-size: 2.5em; font-weight: bold; margin-bottom: 1em; }
  .description { text-align: center; font-size: 1.2em; margin-bottom: 2em; color: #666; }
  label, h2 { display: block; font-weight: 600; margin: 1em 0 .4em; font-size: 1em; }
  textarea { width: 100%; box-sizing: border-box; font: inherit; padding: .6em; border-radius: 8px; border: 1px solid #ccc; }
  button.primary { width: 100%; margin-top: .8em; padding: .8em; font-size: 1.1em; border: 0; border-radius: 8px; background: #2E8B57; color: #fff; cursor: pointer; }
  .response .markdown { background: #fff; border-radius: 8px; padding: .2em 1em; border: 1px solid #e3e3e3; }
  button.example { display: block; width: 100%; text-align: left; margin: .3em 0; padding: .5em; border: 1px solid #e3e3e3; border-radius: 6px; background: #fff; cursor: pointer; }
</style>
</head>
<body>
<main class="container">
  <div class="title">🌸 {{ title }}</div>
  <div class="description">{{ description }}</div>

  <form id="ask-form" method="post" action="/">
    <label for="question">Your Question</label>
    <textarea id="question" name="question" rows="3" placeholder="e.g., What are menstrual cramps?">{{ question }}</textarea>
    <button type="submit" class="primary">Ask the Chatbot</button>
  </form>

  <section class="response">
    <h2>Chatbot Response</h2>
    {% if response_html %}<div class="markdown">{{ response_html|safe }}</div>{% endif %}
  </section>

  <section class="examples">
    <h2>Example Questions (Click to try)</h2>
    {% for example in examples %}
    <button type="button" class="example" data-question="{{ example }}">{{ example }}</button>
    {% endfor %}
  </section>
</main>
<script>
  const form = document.getElementById("ask-form");
  const box = document.getElementById("question");
  box.addEventListener("keydown", (e) => {
    if (e.key === "Enter" && !e.shiftKey) {
      e.preventDefault();
      form.requestSubmit();
    }
  });
  document.querySelectorAll("button.example").forEach((b) => {
    b.addEventListener("click", () => { box.value = b.dataset.question; box.focus(); });
  });
</script>
</body>
</html>
"#;

/// Renders the page from its embedded template.
pub struct Page {
    env: Environment<'static>,
}

impl Page {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, INDEX_HTML)?;
        Ok(Self { env })
    }

    /// `question` refills the text box; `reply` is Markdown.
    pub fn render(&self, question: &str, reply: Option<&str>) -> Result<String> {
        let tmpl = self.env.get_template(TEMPLATE_NAME)?;
        let response_html = reply.map(markdown_to_html);
        Ok(tmpl.render(context! {
            title => TITLE,
            description => DESCRIPTION,
            question => question,
            response_html => response_html,
            examples => EXAMPLE_QUESTIONS,
        })?)
    }
}

/// CommonMark → HTML. Raw HTML in the input is shown as text.
pub fn markdown_to_html(markdown: &str) -> String {
    let events = Parser::new_ext(markdown, Options::empty()).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}
