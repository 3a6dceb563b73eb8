//! Data models for the post digest.
//!
//! This module contains all the core data structures used throughout
//! the application for representing posts, comments, and authors as
//! served by the test server's JSON API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of media attached to a post.
///
/// The server encodes this as an UPPERCASE string (`"IMAGE"`, `"VIDEO"`, `"AUDIO"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AttachmentType {
    Image,
    Video,
    Audio,
}

impl fmt::Display for AttachmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachmentType::Image => write!(f, "Image"),
            AttachmentType::Video => write!(f, "Video"),
            AttachmentType::Audio => write!(f, "Audio"),
        }
    }
}

/// Media attached to a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    /// URL of the attached media.
    pub url: String,
    /// Human-readable description.
    pub description: String,
    /// Kind of media.
    #[serde(rename = "type")]
    pub attachment_type: AttachmentType,
}

/// A blog post as returned by `GET /api/slow/posts`.
///
/// Immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Post identifier.
    pub id: i64,
    /// Identifier of the post's author.
    pub author_id: i64,
    /// Post body text.
    pub content: String,
    /// Publication time, wire format is epoch seconds.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub published: DateTime<Utc>,
    /// Number of likes.
    pub likes: i64,
    /// Whether the current user liked the post.
    pub liked_by_me: bool,
    /// Optional media attachment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
}

/// A comment as returned by `GET /api/slow/posts/{id}/comments`.
///
/// Immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Comment identifier.
    pub id: i64,
    /// Identifier of the post this comment belongs to.
    pub post_id: i64,
    /// Identifier of the comment's author.
    pub author_id: i64,
    /// Comment body text.
    pub content: String,
    /// Number of likes.
    pub likes: i64,
    /// Whether the current user liked the comment.
    pub liked_by_me: bool,
}

/// An author record as returned by `GET /api/authors/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Author identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Avatar URL.
    pub avatar: String,
}

/// A comment paired with its resolved author.
///
/// `author` is `None` when the author fetch was attempted and failed;
/// the comment itself is always present.
#[derive(Debug, Clone, Serialize)]
pub struct CommentWithAuthor {
    pub comment: Comment,
    pub author: Option<Author>,
}

/// A post together with its resolved author and enriched comments.
#[derive(Debug, Clone, Serialize)]
pub struct PostWithDetails {
    pub post: Post,
    /// `None` when the author fetch was attempted and failed.
    pub author: Option<Author>,
    /// Comments in the order the comments endpoint returned them.
    pub comments: Vec<CommentWithAuthor>,
}

/// Closing statistics for a digest run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DigestSummary {
    /// Total number of posts.
    pub posts: usize,
    /// Total number of comments across all posts.
    pub comments: usize,
    /// Posts whose author record was resolved.
    pub resolved_post_authors: usize,
    /// Comments whose author record was resolved.
    pub resolved_comment_authors: usize,
}

impl DigestSummary {
    /// Compute summary statistics from a slice of enriched posts.
    pub fn from_details(details: &[PostWithDetails]) -> Self {
        Self {
            posts: details.len(),
            comments: details.iter().map(|d| d.comments.len()).sum(),
            resolved_post_authors: details.iter().filter(|d| d.author.is_some()).count(),
            resolved_comment_authors: details
                .iter()
                .flat_map(|d| &d.comments)
                .filter(|c| c.author.is_some())
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_post(id: i64, author_id: i64) -> Post {
        Post {
            id,
            author_id,
            content: format!("post {}", id),
            published: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            likes: 0,
            liked_by_me: false,
            attachment: None,
        }
    }

    fn make_comment(id: i64, post_id: i64, author_id: i64) -> Comment {
        Comment {
            id,
            post_id,
            author_id,
            content: format!("comment {}", id),
            likes: 0,
            liked_by_me: false,
        }
    }

    #[test]
    fn test_post_decodes_camel_case() {
        let json = r#"{
            "id": 1,
            "authorId": 10,
            "content": "hello",
            "published": 1700000000,
            "likes": 5,
            "likedByMe": true
        }"#;

        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, 1);
        assert_eq!(post.author_id, 10);
        assert_eq!(post.likes, 5);
        assert!(post.liked_by_me);
        assert!(post.attachment.is_none());
        assert_eq!(post.published.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_post_decodes_attachment() {
        let json = r#"{
            "id": 2,
            "authorId": 11,
            "content": "with media",
            "published": 1700000001,
            "likes": 0,
            "likedByMe": false,
            "attachment": {
                "url": "https://example.com/cat.jpg",
                "description": "a cat",
                "type": "IMAGE"
            }
        }"#;

        let post: Post = serde_json::from_str(json).unwrap();
        let attachment = post.attachment.expect("attachment should decode");
        assert_eq!(attachment.url, "https://example.com/cat.jpg");
        assert_eq!(attachment.attachment_type, AttachmentType::Image);
    }

    #[test]
    fn test_comment_decodes_camel_case() {
        let json = r#"{
            "id": 100,
            "postId": 1,
            "authorId": 12,
            "content": "nice",
            "likes": 2,
            "likedByMe": false
        }"#;

        let comment: Comment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.post_id, 1);
        assert_eq!(comment.author_id, 12);
    }

    #[test]
    fn test_attachment_type_rejects_unknown() {
        let result = serde_json::from_str::<AttachmentType>("\"GIF\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_digest_summary() {
        let author = Author {
            id: 10,
            name: "Alice".to_string(),
            avatar: "https://example.com/a.png".to_string(),
        };

        let details = vec![
            PostWithDetails {
                post: make_post(1, 10),
                author: Some(author.clone()),
                comments: vec![
                    CommentWithAuthor {
                        comment: make_comment(100, 1, 10),
                        author: Some(author.clone()),
                    },
                    CommentWithAuthor {
                        comment: make_comment(101, 1, 99),
                        author: None,
                    },
                ],
            },
            PostWithDetails {
                post: make_post(2, 99),
                author: None,
                comments: vec![],
            },
        ];

        let summary = DigestSummary::from_details(&details);
        assert_eq!(summary.posts, 2);
        assert_eq!(summary.comments, 2);
        assert_eq!(summary.resolved_post_authors, 1);
        assert_eq!(summary.resolved_comment_authors, 1);
    }
}
