use v_htmlescape::escape;

use crate::config::DeliveryMode;
use crate::reporting::format_currency;
use crate::roi::{RoiInputs, RoiResult, AUTOMATION_COST, MAX_HOURS_PER_WEEK};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

pub fn render_calculator_page(mode: DeliveryMode) -> String {
    let delivery_hint = match mode {
        DeliveryMode::Smtp => "Your report is emailed as soon as the numbers are in.",
        DeliveryMode::Mock => "Demo mode: reports are logged by the server instead of emailed.",
        DeliveryMode::File => "Preview mode: reports are saved on the server as HTML files.",
    };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Workflow ROI Calculator</title>
    <script src="https://unpkg.com/htmx.org@1.9.12"></script>
    <style>
        body {{
            margin: 0;
            font-family: 'Plus Jakarta Sans', system-ui, -apple-system, 'Segoe UI', sans-serif;
            background: #f4f7f5;
            color: #101f2f;
        }}
        main {{
            width: min(880px, 94vw);
            margin: 3rem auto;
            background: #ffffff;
            border: 1px solid #e2e8f0;
            border-radius: 16px;
            padding: 2.5rem;
            box-shadow: 0 24px 48px rgba(16, 31, 47, 0.08);
        }}
        header h1 {{
            margin: 0;
            font-size: clamp(1.7rem, 3vw, 2.2rem);
        }}
        header p {{
            margin: 0.4rem 0 0;
            color: #6f7e8a;
        }}
        form {{
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
            gap: 1.25rem;
            margin-top: 2rem;
            align-items: end;
        }}
        label {{
            display: flex;
            flex-direction: column;
            gap: 0.45rem;
            font-size: 0.95rem;
            font-weight: 500;
        }}
        input {{
            border-radius: 10px;
            border: 1px solid #cbd5e1;
            padding: 0.7rem 0.85rem;
            font-size: 1rem;
        }}
        input:focus {{
            outline: none;
            border-color: #04a15b;
            box-shadow: 0 0 0 4px rgba(4, 161, 91, 0.15);
        }}
        button {{
            border: none;
            border-radius: 10px;
            padding: 0.85rem 1.5rem;
            font-size: 1rem;
            font-weight: 600;
            cursor: pointer;
            background: #04a15b;
            color: #ffffff;
        }}
        .hint {{
            margin-top: 1rem;
            font-size: 0.85rem;
            color: #6f7e8a;
        }}
        .results {{
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
            gap: 1rem;
            margin-top: 2rem;
        }}
        .card {{
            border-radius: 12px;
            padding: 1.25rem;
            text-align: center;
        }}
        .card strong {{
            display: block;
            font-size: 2rem;
            margin-top: 0.4rem;
        }}
        .card small {{
            display: block;
            margin-top: 0.3rem;
        }}
        .loss {{ background: #fdecee; color: #b42332; }}
        .break-even {{ background: #fff6d6; color: #8a6209; }}
        .savings {{ background: #e3f6ec; color: #04733f; }}
        .notice {{
            margin-top: 1.5rem;
            padding: 0.9rem 1.1rem;
            border-radius: 10px;
            font-weight: 500;
        }}
        .notice-success {{ background: #e3f6ec; color: #04733f; }}
        .notice-error {{ background: #fdecee; color: #b42332; }}
        .htmx-request button {{ opacity: 0.6; cursor: progress; }}
    </style>
</head>
<body>
<main>
    <header>
        <h1>Workflow ROI Calculator</h1>
        <p>See what manual work costs you today and how quickly automation pays for itself.</p>
    </header>
    <form hx-post="/calculate" hx-target="#roi-results" hx-swap="innerHTML">
        <label>
            Employees doing manual work
            <input type="number" name="team_members" min="1" step="1" required>
        </label>
        <label>
            Hours per employee/week
            <input type="number" name="hours_per_week" min="0" max="{max_hours}" step="any" required>
        </label>
        <label>
            Hourly cost (with overhead)
            <input type="number" name="hourly_rate" min="0" step="any" required>
        </label>
        <label>
            Monthly error cost (optional)
            <input type="number" name="monthly_error_cost" min="0" step="any">
        </label>
        <label>
            Cost per error (optional)
            <input type="number" name="cost_per_error" min="0" step="any">
        </label>
        <label>
            Work email
            <input type="email" name="email" placeholder="you@company.com" required autocomplete="email">
        </label>
        <button type="submit">Calculate &amp; send report</button>
    </form>
    <p class="hint">Estimates assume a one-time automation investment of ${investment}. {hint}</p>
    <section id="roi-results"></section>
</main>
</body>
</html>"##,
        max_hours = MAX_HOURS_PER_WEEK,
        investment = format_currency(AUTOMATION_COST),
        hint = escape(delivery_hint),
    )
}

pub fn render_notice(notice: &Notice) -> String {
    let class = match notice.kind {
        NoticeKind::Success => "notice-success",
        NoticeKind::Error => "notice-error",
    };
    format!(
        r#"<div class="notice {class}" role="status">{}</div>"#,
        escape(&notice.message)
    )
}

pub fn render_results(inputs: &RoiInputs, result: &RoiResult, notice: &Notice) -> String {
    let break_even = result.break_even();
    let secondary = break_even
        .secondary
        .as_deref()
        .map(|text| format!("<small>{}</small>", escape(text)))
        .unwrap_or_default();
    let savings_caption = if result.is_viable() {
        "Net of the automation investment"
    } else {
        "Automation does not pay back within the first year"
    };

    format!(
        r#"<div class="results" data-recipient="{recipient}"><div class="card loss">Current monthly loss<strong>${monthly_loss}</strong></div><div class="card break-even">Break-even timeline<strong>{primary}</strong>{secondary}</div><div class="card savings">Annual savings potential<strong>${annual_savings}</strong><small>{caption}</small></div></div>{notice}"#,
        recipient = escape(&inputs.email),
        monthly_loss = format_currency(result.monthly_loss),
        primary = escape(&break_even.primary),
        secondary = secondary,
        annual_savings = format_currency(result.annual_savings),
        caption = savings_caption,
        notice = render_notice(notice),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roi::compute;

    #[test]
    fn page_posts_to_calculate() {
        let page = render_calculator_page(DeliveryMode::Mock);
        assert!(page.contains(r#"hx-post="/calculate""#));
        assert!(page.contains(r#"max="168""#));
        assert!(page.contains("$18,000"));
        assert!(page.contains("Demo mode"));
    }

    #[test]
    fn results_fragment_shows_figures_and_escapes_notice() {
        let inputs = RoiInputs {
            team_members: 20.0,
            hours_per_week: 40.0,
            hourly_rate: 50.0,
            monthly_error_cost: 1000.0,
            cost_per_error: 0.0,
            email: "ops@example.com".into(),
        };
        let result = compute(&inputs);
        let html = render_results(&inputs, &result, &Notice::error("<b>down</b>"));
        assert!(html.contains("$161,000"));
        assert!(html.contains("$1,914,000"));
        assert!(html.contains("0.1 months"));
        assert!(html.contains("&lt;b&gt;down"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("notice-error"));
    }
}
