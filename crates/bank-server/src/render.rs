//! HTML Pages
//!
//! Server-rendered markup for the login form and the dashboard. Every value
//! that originates from stored records or the text model is escaped.

use std::fmt::Write;

use bank_advisor::{DashboardInsights, Transaction};

const STYLE: &str = "body{font-family:sans-serif;margin:2rem auto;max-width:960px;color:#222}\
    h1,h2{color:#1a3d6d}section{margin-bottom:1.5rem}\
    table{border-collapse:collapse;width:100%}td,th{border:1px solid #ccc;padding:4px 8px;text-align:left}\
    .alert{color:#a4161a}.muted{color:#777}pre{background:#f4f4f4;padding:8px}";

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title>\
         <style>{STYLE}</style></head><body>{body}</body></html>",
        escape_html(title)
    )
}

pub fn login_page() -> String {
    page(
        "Login",
        "<h1>Personal Banking Login</h1>\
         <form method=\"post\" action=\"/login\">\
         <p><label>Username <input type=\"text\" name=\"username\" required></label></p>\
         <p><label>Password <input type=\"password\" name=\"password\" required></label></p>\
         <p><button type=\"submit\">Login</button></p></form>",
    )
}

fn list(items: &[String], empty: &str, class: &str) -> String {
    if items.is_empty() {
        return format!("<p class=\"muted\">{empty}</p>");
    }
    let mut html = String::from("<ul>");
    for item in items {
        let _ = write!(html, "<li class=\"{class}\">{}</li>", escape_html(item));
    }
    html.push_str("</ul>");
    html
}

fn transaction_table(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "<p class=\"muted\">None</p>".into();
    }
    let mut html = String::from("<table><tr><th>Date</th><th>Description</th><th>Amount</th></tr>");
    for tx in transactions {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            tx.date,
            escape_html(&tx.description),
            tx.amount
        );
    }
    html.push_str("</table>");
    html
}

/// Dashboard body; `chart_uri` is a `data:` URI for the category chart
pub fn dashboard_page(insights: &DashboardInsights, chart_uri: &str) -> String {
    let snapshot = &insights.snapshot;
    let account = &snapshot.account;
    let mut body = String::new();

    let _ = write!(
        body,
        "<h1>Welcome, {}</h1><p><a href=\"/logout\">Log out</a></p>",
        escape_html(&account.username)
    );

    let _ = write!(
        body,
        "<section><h2>Profile</h2><table>\
         <tr><th>Email</th><td>{}</td></tr>\
         <tr><th>Income</th><td>{}</td></tr>\
         <tr><th>Expenses</th><td>{}</td></tr>\
         <tr><th>Savings Goal</th><td>{}</td></tr>\
         <tr><th>Risk Tolerance</th><td>{}</td></tr>\
         <tr><th>Investment Goals</th><td>{}</td></tr>\
         <tr><th>Credit Score</th><td>{}</td></tr>\
         <tr><th>Savings Balance</th><td>{}</td></tr>\
         <tr><th>Loan Balance</th><td>{} at {}%</td></tr>\
         </table></section>",
        escape_html(account.email.as_deref().unwrap_or("-")),
        account.income,
        account.expenses,
        account.savings_goal,
        account.risk_tolerance,
        escape_html(&account.investment_goals),
        account.credit_score,
        snapshot.savings.balance,
        snapshot.loan.balance,
        snapshot.loan.interest_rate,
    );

    let _ = write!(
        body,
        "<section><h2>Notifications</h2>{}</section>",
        list(&insights.notifications, "No notifications.", "alert")
    );

    let _ = write!(
        body,
        "<section><h2>Investment Strategy</h2><pre>{}</pre></section>",
        escape_html(&insights.strategy.summary)
    );

    let _ = write!(
        body,
        "<section><h2>Recommended Products</h2>{}</section>",
        list(&insights.products, "No product recommendations.", "product")
    );

    let note = if insights.narrative.generated {
        ""
    } else {
        "<p class=\"muted\">Generated advice is temporarily unavailable.</p>"
    };
    let _ = write!(
        body,
        "<section><h2>Personalized Recommendations</h2><p>{}</p>{note}</section>",
        escape_html(&insights.narrative.text)
    );

    let _ = write!(
        body,
        "<section><h2>Spending by Category</h2><img alt=\"Transaction Categories Distribution\" src=\"{}\">",
        escape_html(chart_uri)
    );
    for (category, transactions) in insights.categories.iter() {
        let _ = write!(
            body,
            "<h3>{category} ({})</h3>{}",
            transactions.len(),
            transaction_table(transactions)
        );
    }
    body.push_str("</section>");

    let _ = write!(
        body,
        "<section><h2>Recent Transactions</h2>{}<p>Net total: {}</p></section>",
        transaction_table(&snapshot.transactions),
        snapshot.transaction_total()
    );

    page("Dashboard", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<script>alert('x') & \"y\"</script>"),
            "&lt;script&gt;alert(&#39;x&#39;) &amp; &quot;y&quot;&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_login_page_posts_credentials() {
        let html = login_page();
        assert!(html.contains("action=\"/login\""));
        assert!(html.contains("name=\"username\""));
        assert!(html.contains("name=\"password\""));
    }
}
