use crate::error::{Error, Result};
use crate::models::{NewPlayer, NewTeam, Player, Team, TeamId, TeamPatch};
use crate::store::EntityStore;

/// Creates the team and puts its captain on the roster.
pub async fn register_team<S: EntityStore + ?Sized>(
    store: &S,
    name: &str,
    captain: i64,
    has_first_pick: bool,
) -> Result<Team> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Configuration(String::from("team name cannot be empty")));
    }
    if store.get_team_by_member(captain).await?.is_some() {
        return Err(Error::AlreadyOnTeam(captain));
    }
    let team = store
        .insert_team(NewTeam {
            name: name.to_string(),
            captain,
            has_first_pick,
        })
        .await?;
    store
        .insert_player(NewPlayer {
            team_id: team.id,
            member: captain,
        })
        .await?;
    log::info!(
        "Team {} created: {} (first pick: {})",
        team.id,
        team.name,
        team.has_first_pick
    );
    Ok(team)
}

pub async fn set_first_pick<S: EntityStore + ?Sized>(
    store: &S,
    team: TeamId,
    has_first_pick: bool,
) -> Result<Team> {
    store
        .patch_team(
            team,
            TeamPatch {
                has_first_pick: Some(has_first_pick),
                ..Default::default()
            },
        )
        .await
}

/// Stores the external thread and voice channel a team communicates in.
pub async fn set_channels<S: EntityStore + ?Sized>(
    store: &S,
    team: TeamId,
    thread_id: Option<String>,
    voice_channel_id: Option<String>,
) -> Result<Team> {
    store
        .patch_team(
            team,
            TeamPatch {
                has_first_pick: None,
                thread_id,
                voice_channel_id,
            },
        )
        .await
}

pub async fn add_player<S: EntityStore + ?Sized>(
    store: &S,
    team: TeamId,
    member: i64,
) -> Result<Player> {
    if store.get_team(team).await?.is_none() {
        return Err(Error::Configuration(format!("team {team} does not exist")));
    }
    let player = store
        .insert_player(NewPlayer {
            team_id: team,
            member,
        })
        .await?;
    log::info!("Member {} added to team {}", member, team);
    Ok(player)
}

/// Adds members in order and stops at the first one that cannot join.
pub async fn add_players<S: EntityStore + ?Sized>(
    store: &S,
    team: TeamId,
    members: &[i64],
) -> Result<Vec<Player>> {
    let mut players = Vec::with_capacity(members.len());
    for member in members {
        players.push(add_player(store, team, *member).await?);
    }
    Ok(players)
}

pub async fn team_members<S: EntityStore + ?Sized>(store: &S, team: TeamId) -> Result<Vec<i64>> {
    Ok(store
        .get_players(team)
        .await?
        .into_iter()
        .map(|p| p.member)
        .collect())
}

pub async fn team_of_player<S: EntityStore + ?Sized>(
    store: &S,
    member: i64,
) -> Result<Option<Team>> {
    store.get_team_by_member(member).await
}

pub async fn find_team_by_thread<S: EntityStore + ?Sized>(
    store: &S,
    thread_id: &str,
) -> Result<Option<Team>> {
    store.get_team_by_thread_id(thread_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn channels_and_first_pick_can_change_after_creation() {
        let store = MemoryStore::new();
        let team = register_team(&store, " Alpha ", 1001, false).await.unwrap();
        assert_eq!(team.name, "Alpha");

        let team = set_first_pick(&store, team.id, true).await.unwrap();
        assert!(team.has_first_pick);

        let team = set_channels(&store, team.id, Some("thread-1".into()), None)
            .await
            .unwrap();
        assert_eq!(team.thread_id.as_deref(), Some("thread-1"));
        assert_eq!(team.voice_channel_id, None);
        assert!(team.has_first_pick);
    }

    #[tokio::test]
    async fn rosters_hold_each_member_once() {
        let store = MemoryStore::new();
        let alpha = register_team(&store, "Alpha", 1001, true).await.unwrap();
        let bravo = register_team(&store, "Bravo", 2002, false).await.unwrap();

        add_players(&store, alpha.id, &[11, 12, 13]).await.unwrap();
        assert_eq!(
            team_members(&store, alpha.id).await.unwrap(),
            vec![1001, 11, 12, 13]
        );

        let err = add_player(&store, bravo.id, 12).await.unwrap_err();
        assert!(matches!(err, Error::AlreadyOnTeam(12)));
        assert!(matches!(
            register_team(&store, "Charlie", 11, false).await,
            Err(Error::AlreadyOnTeam(11))
        ));
        assert!(matches!(
            add_player(&store, 9999, 99).await,
            Err(Error::Configuration(_))
        ));

        let team = team_of_player(&store, 13).await.unwrap().unwrap();
        assert_eq!(team.id, alpha.id);
        assert_eq!(team_of_player(&store, 2002).await.unwrap().unwrap().id, bravo.id);
        assert_eq!(team_of_player(&store, 77).await.unwrap(), None);
        assert_eq!(team_members(&store, bravo.id).await.unwrap(), vec![2002]);
    }

    #[tokio::test]
    async fn teams_are_found_by_thread() {
        let store = MemoryStore::new();
        let team = register_team(&store, "Alpha", 1001, true).await.unwrap();
        assert_eq!(find_team_by_thread(&store, "thread-7").await.unwrap(), None);

        set_channels(&store, team.id, Some("thread-7".into()), None)
            .await
            .unwrap();
        let found = find_team_by_thread(&store, "thread-7").await.unwrap().unwrap();
        assert_eq!(found.id, team.id);
    }

    #[tokio::test]
    async fn blank_names_are_rejected() {
        let store = MemoryStore::new();
        assert!(matches!(
            register_team(&store, "  ", 1, true).await,
            Err(Error::Configuration(_))
        ));
    }
}
