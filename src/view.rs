// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTML rendering of the page. Pure functions of [`ViewState`].

use crate::models::{Profile, WeightSample};
use crate::session::ViewState;
use crate::time_utils::format_iso_millis;
use std::fmt::Write;

pub const TITLE: &str = "Best Coach Ever";
pub const SIGN_IN_LABEL: &str = "Sign in with Google 🚀 ";
pub const LOG_OUT_LABEL: &str = "Log out";

/// Render the whole page for `state`.
pub fn render(state: &ViewState) -> String {
    let mut body = String::new();
    let _ = write!(body, "<h2>{}</h2>", TITLE);

    if state.is_signed_in() {
        body.push_str(&user_profile(state.profile.as_ref()));
        body.push_str(&weight_chart(&state.weight_samples));
    } else {
        body.push_str(&sign_in_button());
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>{}</title></head><body><div>{}</div></body></html>\n",
        TITLE, body
    )
}

pub fn sign_in_button() -> String {
    format!(
        "<form method=\"get\" action=\"/auth/google\">\
         <button type=\"submit\">{}</button></form>",
        SIGN_IN_LABEL
    )
}

/// Profile card, or the loading placeholder while the profile is unset.
pub fn user_profile(profile: Option<&Profile>) -> String {
    let Some(profile) = profile else {
        return loading_screen();
    };

    format!(
        "<div>\
         <img src=\"{}\" alt=\"user image\">\
         <h3>User Logged in</h3>\
         <p>Name: {}</p>\
         <p>Email Address: {}</p>\
         <br><br>\
         <form method=\"post\" action=\"/auth/logout\">\
         <button type=\"submit\">{}</button></form>\
         </div>",
        escape(&profile.picture),
        escape(&profile.name),
        escape(&profile.email),
        LOG_OUT_LABEL
    )
}

/// One row per sample.
///
/// `date` holds epoch microseconds but is formatted as if it were
/// milliseconds, so displayed timestamps land far in the future.
pub fn weight_chart(samples: &[WeightSample]) -> String {
    let mut out = String::new();
    for sample in samples {
        let _ = write!(
            out,
            "<div><p>weight {}</p><p>date {}</p></div>",
            sample.weight,
            format_iso_millis(sample.date)
        );
    }
    out
}

pub fn loading_screen() -> String {
    "<div></div>".to_string()
}

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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
