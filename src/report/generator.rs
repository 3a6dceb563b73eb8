//! Console digest generation.
//!
//! This module renders the enriched posts into the human-readable digest
//! printed at the end of a run. The format is illustrative, not a stable
//! machine contract.

use crate::config::ReportConfig;
use crate::models::{CommentWithAuthor, DigestSummary, PostWithDetails};

const WIDE_RULE: usize = 100;
const POST_RULE: usize = 90;
const COMMENT_RULE: usize = 40;

/// Render the complete digest.
pub fn generate_digest(details: &[PostWithDetails], options: &ReportConfig) -> String {
    let mut output = String::new();

    output.push_str(&render_header());

    if details.is_empty() {
        output.push_str("❌ No posts to display\n");
        return output;
    }

    for (index, detail) in details.iter().enumerate() {
        output.push_str(&render_post(index, detail, options));
    }

    output.push_str(&render_summary(&DigestSummary::from_details(details)));

    output
}

/// Render the digest header banner.
fn render_header() -> String {
    format!("\n{}\n📱 LOADED POSTS\n{}\n", "═".repeat(WIDE_RULE), "═".repeat(WIDE_RULE))
}

/// Render one post block with its author, attachment, and comments.
fn render_post(index: usize, detail: &PostWithDetails, options: &ReportConfig) -> String {
    let post = &detail.post;
    let mut block = String::new();

    block.push_str(&format!("\n📌 POST #{} (ID: {})\n", index + 1, post.id));

    match &detail.author {
        Some(author) => {
            block.push_str(&format!("   👤 Author: {} (ID: {})\n", author.name, post.author_id));
            if options.show_avatars {
                block.push_str(&format!("   🖼️ Avatar: {}\n", author.avatar));
            }
        }
        None => {
            block.push_str(&format!("   👤 Author: ID {} (not loaded)\n", post.author_id));
        }
    }

    block.push_str(&format!("   💬 Content: {}\n", post.content));
    block.push_str(&format!(
        "   📅 Published: {}\n",
        post.published.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    block.push_str(&format!(
        "   ❤️ Likes: {}{}\n",
        post.likes,
        if post.liked_by_me { " 👍" } else { "" }
    ));

    if options.show_attachments {
        if let Some(attachment) = &post.attachment {
            block.push_str(&format!("   📎 Attachment: {}\n", attachment.url));
            block.push_str(&format!("   📝 Description: {}\n", attachment.description));
            block.push_str(&format!("   🏷️ Type: {}\n", attachment.attachment_type));
        }
    }

    if detail.comments.is_empty() {
        block.push_str("\n   💭 No comments\n");
    } else {
        block.push_str(&format!("\n   💭 COMMENTS ({}):\n", detail.comments.len()));
        for (comment_index, comment) in detail.comments.iter().enumerate() {
            block.push_str(&render_comment(comment_index, comment, options));
        }
    }

    block.push_str(&format!("   {}\n", "─".repeat(POST_RULE)));

    block
}

/// Render one comment row.
fn render_comment(index: usize, row: &CommentWithAuthor, options: &ReportConfig) -> String {
    let comment = &row.comment;
    let mut block = String::new();

    block.push_str(&format!("      {}. Comment ID: {}\n", index + 1, comment.id));

    match &row.author {
        Some(author) => {
            block.push_str(&format!(
                "         👤 Author: {} (ID: {})\n",
                author.name, comment.author_id
            ));
            if options.show_avatars {
                block.push_str(&format!("         🖼️ Avatar: {}\n", author.avatar));
            }
        }
        None => {
            block.push_str(&format!(
                "         👤 Author: ID {} (not loaded)\n",
                comment.author_id
            ));
        }
    }

    block.push_str(&format!("         💬 {}\n", comment.content));
    block.push_str(&format!(
        "         ❤️ {}{}\n",
        comment.likes,
        if comment.liked_by_me { " 👍" } else { "" }
    ));
    block.push_str(&format!("         {}\n", "─".repeat(COMMENT_RULE)));

    block
}

/// Render the closing statistics section.
fn render_summary(summary: &DigestSummary) -> String {
    let mut section = String::new();

    section.push_str(&format!("\n📊 TOTAL POSTS: {}\n", summary.posts));
    section.push_str(&format!("📊 TOTAL COMMENTS: {}\n", summary.comments));
    section.push_str(&format!(
        "📊 Post authors loaded: {} of {}\n",
        summary.resolved_post_authors, summary.posts
    ));
    section.push_str(&format!(
        "📊 Comment authors loaded: {} of {}\n",
        summary.resolved_comment_authors, summary.comments
    ));
    section.push_str(&format!("{}\n", "═".repeat(WIDE_RULE)));

    section
}
