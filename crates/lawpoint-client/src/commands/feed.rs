//! The LawyerUp feed: lawyers post, everyone likes and comments.

use chrono::Utc;
use tracing::{debug, info};

use lawpoint_shared::constants::{COMMENT_ID_PREFIX, POST_ID_PREFIX};
use lawpoint_shared::models::{Comment, Commenter, LawyerUpPost};
use lawpoint_shared::patch::PostPatch;
use lawpoint_shared::types::new_id;

use crate::error::{ClientError, Result};
use crate::mirror::MirrorCommand;
use crate::state::Marketplace;

impl Marketplace {
    /// Publish a post as the signed-in lawyer. Returns the post id.
    pub fn create_post(&mut self, text: &str, image_url: Option<String>) -> Result<String> {
        let lawyer = self.signed_in_lawyer()?;

        let post = LawyerUpPost {
            id: new_id(POST_ID_PREFIX),
            lawyer_id: lawyer.user.id.clone(),
            lawyer_name: lawyer.user.name.clone(),
            lawyer_profile_pic_url: lawyer.user.profile_pic_url.clone(),
            text: text.to_string(),
            image_url,
            timestamp: Utc::now(),
            likes: Vec::new(),
            comments: Vec::new(),
        };
        let id = post.id.clone();
        info!(post_id = %id, lawyer_id = %post.lawyer_id, "Post created");

        self.posts.insert(0, post.clone());
        self.mirror(MirrorCommand::CreatePost(post));
        Ok(id)
    }

    pub fn delete_post(&mut self, post_id: &str) -> Result<()> {
        let index = self
            .posts
            .iter()
            .position(|p| p.id == post_id)
            .ok_or_else(|| ClientError::unknown("post", post_id))?;
        self.posts.remove(index);
        info!(post_id, "Post deleted");

        self.mirror(MirrorCommand::DeletePost {
            id: post_id.to_string(),
        });
        Ok(())
    }

    /// Toggle the signed-in user's like on a post. Returns whether the post
    /// is now liked by them.
    pub fn like_post(&mut self, post_id: &str) -> Result<bool> {
        let user_id = self.signed_in()?.id().to_string();

        let post = self.post_mut(post_id)?;
        let liked = match post.likes.iter().position(|id| *id == user_id) {
            Some(index) => {
                post.likes.remove(index);
                false
            }
            None => {
                post.likes.push(user_id);
                true
            }
        };
        let patch = PostPatch {
            likes: Some(post.likes.clone()),
            ..Default::default()
        };
        debug!(post_id, liked, "Like toggled");

        self.mirror(MirrorCommand::UpdatePost {
            id: post_id.to_string(),
            patch,
        });
        Ok(liked)
    }

    /// Comment on a post as the signed-in user. Returns the comment id.
    pub fn add_comment(&mut self, post_id: &str, text: &str) -> Result<String> {
        let account = self.signed_in()?;
        let commenter = Commenter {
            id: account.id().to_string(),
            name: account.user().name.clone(),
            profile_pic_url: account.user().profile_pic_url.clone(),
            role: account.role(),
        };
        let comment = Comment {
            id: new_id(COMMENT_ID_PREFIX),
            text: text.to_string(),
            timestamp: Utc::now(),
            commenter,
        };
        let id = comment.id.clone();

        let post = self.post_mut(post_id)?;
        post.comments.push(comment);
        let patch = PostPatch {
            comments: Some(post.comments.clone()),
            ..Default::default()
        };
        debug!(post_id, comment_id = %id, "Comment added");

        self.mirror(MirrorCommand::UpdatePost {
            id: post_id.to_string(),
            patch,
        });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::*;
    use lawpoint_shared::types::UserRole;

    fn with_post() -> (Marketplace, crate::mirror::MirrorReceiver, String) {
        let (mut market, mut rx) = market();
        sign_in_as_lawyer(&mut market);
        let id = market
            .create_post("Know your rights online.", None)
            .unwrap();
        drain(&mut rx);
        (market, rx, id)
    }

    #[test]
    fn test_create_post_requires_lawyer() {
        let (mut market, mut rx) = market();
        sign_in_as_client(&mut market);
        assert!(matches!(
            market.create_post("hello", None),
            Err(ClientError::WrongRole { expected: UserRole::Lawyer })
        ));
        assert!(market.posts().is_empty());
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_create_post_prepends() {
        let (mut market, mut rx, first) = with_post();
        let second = market
            .create_post("Cyber fraud checklist", Some("https://img.example/1.png".into()))
            .unwrap();

        assert_eq!(market.posts()[0].id, second);
        assert_eq!(market.posts()[1].id, first);
        let post = market.post(&second).unwrap();
        assert_eq!(post.lawyer_name, "Anjali Sharma");
        assert_eq!(post.image_url.as_deref(), Some("https://img.example/1.png"));
        assert!(matches!(
            drain(&mut rx).as_slice(),
            [MirrorCommand::CreatePost(p)] if p.id == second
        ));
    }

    #[test]
    fn test_liking_twice_restores_like_set() {
        let (mut market, mut rx, post_id) = with_post();
        sign_in_as_client(&mut market);
        let before = market.post(&post_id).unwrap().likes.clone();

        assert!(market.like_post(&post_id).unwrap());
        assert_eq!(market.post(&post_id).unwrap().likes, vec!["c1".to_string()]);
        assert!(!market.like_post(&post_id).unwrap());
        assert_eq!(market.post(&post_id).unwrap().likes, before);

        let commands = drain(&mut rx);
        assert_eq!(commands.len(), 2);
        match &commands[1] {
            MirrorCommand::UpdatePost { id, patch } => {
                assert_eq!(id, &post_id);
                assert_eq!(patch.likes, Some(Vec::new()));
                assert!(patch.comments.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_likes_from_two_users() {
        let (mut market, _rx, post_id) = with_post();
        market.like_post(&post_id).unwrap();
        sign_in_as_client(&mut market);
        market.like_post(&post_id).unwrap();
        assert_eq!(market.post(&post_id).unwrap().likes, vec!["l1".to_string(), "c1".to_string()]);
    }

    #[test]
    fn test_comment_is_tagged_with_commenter_role() {
        let (mut market, mut rx, post_id) = with_post();
        sign_in_as_client(&mut market);

        let comment_id = market.add_comment(&post_id, "Very helpful, thanks!").unwrap();

        let comment = &market.post(&post_id).unwrap().comments[0];
        assert_eq!(comment.id, comment_id);
        assert_eq!(comment.commenter.id, "c1");
        assert_eq!(comment.commenter.name, "John Doe");
        assert_eq!(comment.commenter.role, UserRole::Client);
        assert!(matches!(
            drain(&mut rx).as_slice(),
            [MirrorCommand::UpdatePost { patch, .. }] if patch.comments.as_ref().map(Vec::len) == Some(1)
        ));
    }

    #[test]
    fn test_feed_actions_need_a_session() {
        let (mut market, _rx, post_id) = with_post();
        market.session = None;
        assert!(matches!(market.like_post(&post_id), Err(ClientError::NotSignedIn)));
        assert!(matches!(market.add_comment(&post_id, "hi"), Err(ClientError::NotSignedIn)));
    }

    #[test]
    fn test_delete_post() {
        let (mut market, mut rx, post_id) = with_post();
        market.delete_post(&post_id).unwrap();
        assert!(market.posts().is_empty());
        assert!(matches!(
            drain(&mut rx).as_slice(),
            [MirrorCommand::DeletePost { id }] if *id == post_id
        ));
        assert!(matches!(
            market.delete_post(&post_id),
            Err(ClientError::UnknownEntity { kind: "post", .. })
        ));
    }
}
