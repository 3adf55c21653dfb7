use super::Email;
use aurora_fest_domain::{format_local, FestivalEvent, ReminderDelay, User, FESTIVAL_TIMEZONE};

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            c => escaped.push(c),
        }
    }
    escaped
}

struct Shell<'a> {
    subtitle: &'a str,
    body_html: &'a str,
    link: &'a str,
    link_label: &'a str,
    footer: &'a str,
}

fn render_shell(shell: Shell<'_>) -> String {
    let link = escape_html(shell.link);
    format!(
        r#"
  <div style="background:#0b0b14;padding:32px;font-family:Inter,system-ui,Arial,sans-serif;color:#fff">
    <table width="100%" cellpadding="0" cellspacing="0" style="max-width:560px;margin:0 auto;background:rgba(255,255,255,0.05);border-radius:16px;overflow:hidden">
      <tr>
        <td style="padding:28px;background:linear-gradient(135deg,#c026d3,#7c3aed,#2563eb);color:#fff">
          <h1 style="margin:0;font-size:22px">Aurora Fest</h1>
          <p style="margin:6px 0 0;font-size:13px;opacity:.9">{subtitle}</p>
        </td>
      </tr>
      <tr>
        <td style="padding:24px 28px;background:#0f0f1a;color:#e5e7eb">
          {body}
          <div style="margin-top:12px">
            <a href="{link}" style="display:inline-block;background:linear-gradient(135deg,#ec4899,#8b5cf6);color:#fff;text-decoration:none;padding:12px 18px;border-radius:999px;font-weight:600">{link_label}</a>
          </div>
          <p style="margin:18px 0 0;font-size:12px;opacity:.8">Si le bouton ne marche pas, copie ce lien :</p>
          <p style="word-break:break-all;font-size:12px;opacity:.8;margin:6px 0 0">{link}</p>
          <p style="margin:18px 0 0;font-size:12px;opacity:.8">{footer}</p>
        </td>
      </tr>
    </table>
  </div>"#,
        subtitle = escape_html(shell.subtitle),
        body = shell.body_html,
        link = link,
        link_label = escape_html(shell.link_label),
        footer = escape_html(shell.footer),
    )
}

fn greeting(user: &User) -> String {
    format!(
        r#"<p style="margin:0 0 14px">Salut {},</p>"#,
        escape_html(user.display_name())
    )
}

fn starts_at(event: &FestivalEvent) -> String {
    format!(
        r#"<p style="margin:0 0 14px">Début&nbsp;: <strong>{}</strong></p>"#,
        escape_html(&format_local(event.start_ts, FESTIVAL_TIMEZONE))
    )
}

/// Email delivered when a `Reminder` fires
pub fn reminder_email(user: &User, event: &FestivalEvent, delay: ReminderDelay, link: &str) -> Email {
    let body_html = format!(
        r#"
          {greeting}
          <p style="margin:0 0 14px">« <strong>{title}</strong> » commence dans <strong>{delay} min</strong>.</p>
          {starts_at}"#,
        greeting = greeting(user),
        title = escape_html(&event.title),
        delay = delay.minutes(),
        starts_at = starts_at(event),
    );
    let subtitle = format!("Rappel {} min avant l’événement", delay.minutes());

    Email {
        to: user.email.clone(),
        to_name: user.name.clone(),
        subject: format!("Rappel {} min — {}", delay.minutes(), event.title),
        html: render_shell(Shell {
            subtitle: &subtitle,
            body_html: &body_html,
            link,
            link_label: "Voir l’événement",
            footer: "Vous recevez cet e-mail car vous avez activé un rappel depuis la fiche de l’événement.",
        }),
    }
}

/// Confirmation sent right after reminders were activated for an event
pub fn reminder_activated_email(
    user: &User,
    event: &FestivalEvent,
    delays: &[ReminderDelay],
    link: &str,
) -> Email {
    let body_html = format!(
        r#"
          {greeting}
          <p style="margin:0 0 14px">Le rappel pour « <strong>{title}</strong> » est activé.</p>
          <p style="margin:0 0 14px">Tu seras prévenu à <strong>{delays} min</strong> avant le début.</p>
          {starts_at}"#,
        greeting = greeting(user),
        title = escape_html(&event.title),
        delays = escape_html(&ReminderDelay::describe(delays)),
        starts_at = starts_at(event),
    );

    Email {
        to: user.email.clone(),
        to_name: user.name.clone(),
        subject: format!("Rappel activé — {}", event.title),
        html: render_shell(Shell {
            subtitle: "Rappel activé",
            body_html: &body_html,
            link,
            link_label: "Voir l’événement",
            footer: "Astuce : autorise les notifications navigateur pour être alerté même si l’onglet est en arrière-plan.",
        }),
    }
}
