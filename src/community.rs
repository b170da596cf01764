use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::{require_text, StoreError};
use crate::store::{Entity, Id, Ordering, Repository};

/// Tag that puts a post under the Questions tab
pub const QUESTION_TAG: &str = "question";
/// Tags attached to posts written from the compose box
pub const DEFAULT_POST_TAGS: [&str; 2] = ["dog", "companion"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
}

impl Author {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Id,
    pub author: Author,
    pub content: String,
    pub created_at: DateTime<Local>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Id,
    pub author: Author,
    pub content: String,
    pub created_at: DateTime<Local>,
    pub likes: u32,
    pub liked: bool,
    pub tags: Vec<String>,
    pub comments: Vec<Comment>,
}

impl Post {
    pub fn new(author: Author, content: impl Into<String>, created_at: DateTime<Local>) -> Self {
        Self {
            id: Id::UNASSIGNED,
            author,
            content: content.into(),
            created_at,
            likes: 0,
            liked: false,
            tags: Vec::new(),
            comments: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_likes(mut self, likes: u32, liked: bool) -> Self {
        self.likes = likes;
        self.liked = liked;
        self
    }

    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = comments;
        self
    }

    pub fn is_question(&self) -> bool {
        self.tags.iter().any(|t| t == QUESTION_TAG)
    }

    fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        self.content.to_lowercase().contains(&query)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&query))
            || self.author.name.to_lowercase().contains(&query)
    }
}

impl Entity for Post {
    const KIND: &'static str = "post";

    fn id(&self) -> Id {
        self.id
    }

    fn assign_id(&mut self, id: Id) {
        self.id = id;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum FeedTab {
    #[default]
    Latest,
    Popular,
    Questions,
}

impl FeedTab {
    pub const ALL: [FeedTab; 3] = [FeedTab::Latest, FeedTab::Popular, FeedTab::Questions];

    pub fn next(self) -> FeedTab {
        match self {
            FeedTab::Latest => FeedTab::Popular,
            FeedTab::Popular => FeedTab::Questions,
            FeedTab::Questions => FeedTab::Latest,
        }
    }

    pub fn prev(self) -> FeedTab {
        match self {
            FeedTab::Latest => FeedTab::Questions,
            FeedTab::Popular => FeedTab::Latest,
            FeedTab::Questions => FeedTab::Popular,
        }
    }
}

/// The community board, newest post first
#[derive(Debug, Clone)]
pub struct CommunityFeed {
    posts: Repository<Post>,
    me: Author,
    next_comment: u64,
}

impl CommunityFeed {
    pub fn new(me: Author, posts: Vec<Post>) -> Self {
        let next_comment = posts
            .iter()
            .flat_map(|p| p.comments.iter())
            .map(|c| c.id.get())
            .max()
            .unwrap_or(0);
        let mut feed = Self {
            posts: Repository::seeded(Ordering::NewestFirst, posts),
            me,
            next_comment,
        };
        feed.renumber_comments();
        feed
    }

    // Seed comments arrive without ids; give each one its own.
    fn renumber_comments(&mut self) {
        let unassigned = self
            .posts
            .iter_mut()
            .flat_map(|post| post.comments.iter_mut())
            .filter(|comment| comment.id == Id::UNASSIGNED);
        for comment in unassigned {
            self.next_comment += 1;
            comment.id = Id::new(self.next_comment);
        }
    }

    pub fn me(&self) -> &Author {
        &self.me
    }

    pub fn posts(&self) -> &[Post] {
        self.posts.list()
    }

    pub fn get(&self, id: Id) -> Option<&Post> {
        self.posts.get(id)
    }

    /// Posts whose content, tags or author name contain `query`
    pub fn search(&self, query: &str) -> Vec<&Post> {
        self.posts.iter().filter(|p| p.matches(query)).collect()
    }

    pub fn view(&self, tab: FeedTab, query: &str) -> Vec<&Post> {
        let mut posts = self.search(query);
        match tab {
            FeedTab::Latest => {}
            FeedTab::Popular => posts.sort_by(|a, b| b.likes.cmp(&a.likes)),
            FeedTab::Questions => posts.retain(|p| p.is_question()),
        }
        posts
    }

    /// Like or unlike; returns whether the post is now liked
    pub fn toggle_like(&mut self, id: Id) -> Result<bool, StoreError> {
        let post = self.posts.update(id, |post| {
            if post.liked {
                post.likes = post.likes.saturating_sub(1);
            } else {
                post.likes += 1;
            }
            post.liked = !post.liked;
        })?;
        Ok(post.liked)
    }

    pub fn add_comment(
        &mut self,
        post_id: Id,
        text: &str,
        now: DateTime<Local>,
    ) -> Result<Comment, StoreError> {
        let content = require_text(text, "comment")?;
        let comment = Comment {
            id: Id::new(self.next_comment + 1),
            author: self.me.clone(),
            content,
            created_at: now,
        };
        self.posts
            .update(post_id, |post| post.comments.push(comment.clone()))?;
        self.next_comment += 1;
        Ok(comment)
    }

    pub fn create_post(&mut self, text: &str, now: DateTime<Local>) -> Result<&Post, StoreError> {
        let content = require_text(text, "post")?;
        let post = Post::new(self.me.clone(), content, now).with_tags(DEFAULT_POST_TAGS);
        Ok(self.posts.create(post))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use assert_matches::assert_matches;

    fn feed() -> CommunityFeed {
        let now = Local::now();
        CommunityFeed::new(seed::current_user(), seed::posts(now))
    }

    #[test]
    fn search_matches_content_tags_and_author() {
        let feed = feed();
        assert_eq!(feed.search("").len(), feed.posts().len());
        assert_eq!(feed.search("PARK").len(), 1);
        assert_eq!(feed.search("golden").len(), 1);
        assert_eq!(feed.search("vet").len(), 1);
        assert!(feed.search("cat").is_empty());
    }

    #[test]
    fn popular_sorts_by_likes_descending() {
        let feed = feed();
        let likes: Vec<_> = feed
            .view(FeedTab::Popular, "")
            .iter()
            .map(|p| p.likes)
            .collect();
        let mut sorted = likes.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(likes, sorted);
    }

    #[test]
    fn questions_tab_only_shows_questions() {
        let feed = feed();
        let questions = feed.view(FeedTab::Questions, "");
        assert!(!questions.is_empty());
        assert!(questions.iter().all(|p| p.is_question()));
    }

    #[test]
    fn like_toggle_is_symmetric() {
        let mut feed = feed();
        let post = &feed.posts()[0];
        let (id, likes, liked) = (post.id, post.likes, post.liked);

        assert_eq!(feed.toggle_like(id), Ok(!liked));
        assert_ne!(feed.get(id).unwrap().likes, likes);
        assert_eq!(feed.toggle_like(id), Ok(liked));
        assert_eq!(feed.get(id).unwrap().likes, likes);
    }

    #[test]
    fn unlike_never_goes_negative() {
        let mut feed = CommunityFeed::new(
            seed::current_user(),
            vec![Post::new(Author::new("u", "u"), "hi", Local::now()).with_likes(0, true)],
        );
        let id = feed.posts()[0].id;
        assert_eq!(feed.toggle_like(id), Ok(false));
        assert_eq!(feed.get(id).unwrap().likes, 0);
    }

    #[test]
    fn create_post_prepends_with_default_tags() {
        let mut feed = feed();
        let before = feed.posts().len();
        let id = feed.create_post("first walk in the snow", Local::now()).unwrap().id;

        assert_eq!(feed.posts().len(), before + 1);
        let post = &feed.posts()[0];
        assert_eq!(post.id, id);
        assert_eq!(post.likes, 0);
        assert_eq!(post.author, seed::current_user());
        assert_eq!(post.tags, vec!["dog", "companion"]);
    }

    #[test]
    fn blank_post_and_comment_are_rejected() {
        let mut feed = feed();
        let id = feed.posts()[0].id;
        assert_matches!(
            feed.create_post("  ", Local::now()),
            Err(StoreError::EmptyContent { .. })
        );
        assert_matches!(
            feed.add_comment(id, "", Local::now()),
            Err(StoreError::EmptyContent { .. })
        );
    }

    #[test]
    fn comment_is_appended_with_unique_id() {
        let mut feed = feed();
        let post_id = feed.posts()[1].id;
        let before = feed.get(post_id).unwrap().comments.len();

        let comment_id = feed.add_comment(post_id, "so brave!", Local::now()).unwrap().id;

        let comments = &feed.get(post_id).unwrap().comments;
        assert_eq!(comments.len(), before + 1);
        assert_eq!(comments.last().unwrap().content, "so brave!");

        let all: Vec<Id> = feed
            .posts()
            .iter()
            .flat_map(|p| p.comments.iter().map(|c| c.id))
            .collect();
        assert_eq!(all.iter().filter(|id| **id == comment_id).count(), 1);
        assert!(!all.contains(&Id::UNASSIGNED));
    }

    #[test]
    fn seed_comments_get_distinct_ids_after_existing_ones() {
        let now = Local::now();
        let numbered = Comment {
            id: Id::new(7),
            author: Author::new("u1", "Bori"),
            content: "first".into(),
            created_at: now,
        };
        let unnumbered = |text: &str| Comment {
            id: Id::UNASSIGNED,
            content: text.into(),
            ..numbered.clone()
        };
        let mut feed = CommunityFeed::new(
            seed::current_user(),
            vec![
                Post::new(Author::new("u2", "Choco"), "a", now)
                    .with_comments(vec![unnumbered("x"), numbered.clone()]),
                Post::new(Author::new("u3", "Dubu"), "b", now)
                    .with_comments(vec![unnumbered("y"), unnumbered("z")]),
            ],
        );

        let ids: Vec<u64> = feed
            .posts()
            .iter()
            .flat_map(|p| p.comments.iter().map(|c| c.id.get()))
            .collect();
        assert_eq!(ids, vec![8, 7, 9, 10]);

        let post_id = feed.posts()[0].id;
        let added = feed.add_comment(post_id, "next", now).unwrap();
        assert_eq!(added.id, Id::new(11));
    }

    #[test]
    fn comment_on_missing_post_fails() {
        let mut feed = feed();
        let err = feed.add_comment(Id::UNASSIGNED, "hello", Local::now()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn tabs_cycle_both_ways() {
        for tab in FeedTab::ALL {
            assert_eq!(tab.next().prev(), tab);
        }
    }
}
