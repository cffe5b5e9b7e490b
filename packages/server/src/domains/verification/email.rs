//! The fixed access email sent for every valid submission.

pub const ACCESS_EMAIL_SUBJECT: &str = "Discord Access Ready - Jesse ON FIRE";

const ACCESS_EMAIL_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <style>
    body { font-family: Arial, sans-serif; background: #1a1a1a; color: #ffffff; padding: 20px; }
    .container { max-width: 600px; margin: 0 auto; background: #2a2a2a; border-radius: 10px; padding: 30px; }
    .header { text-align: center; margin-bottom: 30px; }
    .fire { color: #FF5A1F; font-weight: bold; }
    .steps { background: #1a1a1a; padding: 20px; border-radius: 8px; margin: 20px 0; }
    .step { margin: 15px 0; padding-left: 30px; position: relative; }
    .step-number { position: absolute; left: 0; font-size: 20px; }
    .button { display: inline-block; background: #FF5A1F; color: white; padding: 15px 30px; text-decoration: none; border-radius: 5px; margin: 20px 0; font-weight: bold; }
    .footer { text-align: center; margin-top: 30px; color: #888; font-size: 14px; }
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h1>Welcome to the <span class="fire">Jesse ON FIRE</span> Discord!</h1>
      <p>Your YouTube membership = Discord access. No double payment!</p>
    </div>

    <p>Hey {youtube_handle}!</p>

    <p>Thanks for being a YouTube member! Here's how to get your Discord access in under 2 minutes:</p>

    <div class="steps">
      <div class="step">
        <span class="step-number">1.</span>
        <strong>Join our Discord server:</strong><br>
        Click the button below to join
      </div>

      <center>
        <a href="{invite_url}" class="button">Join Discord Now</a>
      </center>

      <div class="step">
        <span class="step-number">2.</span>
        <strong>Connect your YouTube account:</strong><br>
        In Discord, go to User Settings, then Connections, then Add YouTube
      </div>

      <div class="step">
        <span class="step-number">3.</span>
        <strong>Automatic role assignment:</strong><br>
        Discord will verify your membership and assign your role in 2-3 minutes!
      </div>
    </div>

    <p><strong>Important:</strong></p>
    <ul>
      <li>Your Discord username should be: <strong>{chat_handle}</strong></li>
      <li>If Discord doesn't auto-assign your role, DM a mod with this email</li>
      <li>Your role will be removed automatically if YouTube membership expires</li>
    </ul>

    <p>Need help? Just reply to this email or message @mods in Discord!</p>

    <div class="footer">
      <p>Jesse ON FIRE &bull; 517K Warriors Strong &bull; Uncensored. Unfiltered. Undefeated.</p>
    </div>
  </div>
</body>
</html>
"#;

/// Render the access email for one submission.
pub fn access_email_html(youtube_handle: &str, chat_handle: &str, invite_url: &str) -> String {
    ACCESS_EMAIL_TEMPLATE
        .replace("{youtube_handle}", youtube_handle)
        .replace("{chat_handle}", chat_handle)
        .replace("{invite_url}", invite_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_is_fully_substituted() {
        let html = access_email_html("@Someone", "someone#1234", "https://discord.gg/abc");

        assert!(html.contains("Hey @Someone!"));
        assert!(html.contains("<strong>someone#1234</strong>"));
        assert!(html.contains(r#"href="https://discord.gg/abc""#));
        assert!(!html.contains("{youtube_handle}"));
        assert!(!html.contains("{chat_handle}"));
        assert!(!html.contains("{invite_url}"));
    }
}
